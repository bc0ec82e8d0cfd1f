//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "marquee";
const PROJECT_FILES: [&str; 2] = ["marquee.toml", ".marquee.toml"];
const ENV_PREFIX: &str = "MARQUEE_";

/// Where configuration is read from, lowest priority first
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub global: Option<PathBuf>,
    pub project: Option<PathBuf>,
    pub explicit: Option<PathBuf>,
    /// Merge `MARQUEE_*` environment variables last
    pub env: bool,
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `MARQUEE_*` environment variables (`__` separates sections)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./marquee.toml` or `./.marquee.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/marquee/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::load_from(&ConfigSources {
            global: Self::global_config_path(),
            project: Self::project_config_path(),
            explicit: config_path.cloned(),
            env: true,
        })
    }

    /// Load from an explicit set of sources
    pub fn load_from(sources: &ConfigSources) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = &sources.global
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        if let Some(project_path) = &sources.project {
            figment = figment.merge(Toml::file(project_path));
        }

        // An explicit file must exist; a typo should not silently fall back
        if let Some(path) = &sources.explicit {
            figment = figment.merge(Toml::file_exact(path));
        }

        if sources.env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/marquee/config.toml if set,
    /// otherwise falls back to ~/.config/marquee/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        Self::find_project_config(Path::new("."))
    }

    fn find_project_config(dir: &Path) -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(explicit: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        println!("  [ ENV ] Environment: {}*", ENV_PREFIX);

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./marquee.toml or ./.marquee.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.selection.method, "score");
        assert!(config.output.color);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("marquee"));
    }

    #[test]
    fn test_no_sources_gives_defaults() {
        let config = ConfigLoader::load_from(&ConfigSources::default()).unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_later_files_override_earlier() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("marquee.toml");
        let explicit = dir.path().join("explicit.toml");

        fs::write(
            &global,
            "[selection]\nmethod = \"loved\"\nfilter_dislikes = true\n\n[store]\npoll_interval_ms = 50\n",
        )
        .unwrap();
        fs::write(&project, "[selection]\nmethod = \"battle\"\n").unwrap();
        fs::write(&explicit, "[store]\npoll_interval_ms = 75\n").unwrap();

        let config = ConfigLoader::load_from(&ConfigSources {
            global: Some(global),
            project: Some(project),
            explicit: Some(explicit),
            env: false,
        })
        .unwrap();

        assert_eq!(config.selection.method, "battle");
        // untouched keys survive from lower layers
        assert!(config.selection.filter_dislikes);
        assert_eq!(config.store.poll_interval_ms, 75);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigLoader::load_from(&ConfigSources {
            explicit: Some(dir.path().join("nope.toml")),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_find_project_config_prefers_plain_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".marquee.toml"), "").unwrap();
        assert_eq!(
            ConfigLoader::find_project_config(dir.path()),
            Some(dir.path().join(".marquee.toml"))
        );
        fs::write(dir.path().join("marquee.toml"), "").unwrap();
        assert_eq!(
            ConfigLoader::find_project_config(dir.path()),
            Some(dir.path().join("marquee.toml"))
        );
    }
}
