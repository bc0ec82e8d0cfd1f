//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod logging;
mod output;
mod selection;
mod store;

pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use selection::FileSelectionConfig;
pub use store::FileStoreConfig;

use marquee_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Default selection behavior
    pub selection: FileSelectionConfig,
    /// Snapshot store settings
    pub store: FileStoreConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Audit log settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks:
    /// 1. Selection method name and runoff alternations
    /// 2. Snapshot poll interval
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.selection.to_selection_config().1;

        if self.store.poll_interval_ms == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroPollInterval,
                "store.poll_interval_ms cannot be 0",
            ));
        }

        issues
    }
}
