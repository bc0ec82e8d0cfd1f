//! Configuration file loading for marquee
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `MARQUEE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./marquee.toml` or `./.marquee.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/marquee/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileLoggingConfig, FileOutputConfig, FileSelectionConfig, FileStoreConfig,
};
pub use loader::{ConfigLoader, ConfigSources};
