//! Presentation-level configuration
//!
//! Resolved output settings: CLI flags win over the config file.

use marquee_domain::OutputFormat;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Show progress bars and replays
    pub show_progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: true,
            show_progress: true,
        }
    }
}

impl OutputConfig {
    /// Merge CLI flags over file settings
    pub fn resolve(
        cli_format: Option<OutputFormat>,
        file_format: Option<OutputFormat>,
        file_color: bool,
        no_color: bool,
        quiet: bool,
    ) -> Self {
        let format = cli_format.or(file_format).unwrap_or_default();
        Self {
            format,
            color: file_color && !no_color,
            // progress output would corrupt a JSON document
            show_progress: !quiet && format == OutputFormat::Text,
        }
    }

    /// Apply the color setting to the terminal
    pub fn apply(&self) {
        if !self.color {
            colored::control::set_override(false);
        }
    }
}
