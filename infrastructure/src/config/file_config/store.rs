//! Store configuration from TOML (`[store]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Raw store configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreConfig {
    /// Event snapshot file used when `--snapshot` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<PathBuf>,
    /// How often the snapshot feed re-reads the file
    pub poll_interval_ms: u64,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            snapshot: None,
            poll_interval_ms: 1000,
        }
    }
}

impl FileStoreConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
