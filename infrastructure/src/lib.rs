//! Infrastructure layer for marquee
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: event stores, the vote change feeds,
//! the JSONL audit log, and configuration file loading.

pub mod config;
pub mod logging;
pub mod store;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigSources, FileConfig, FileLoggingConfig, FileOutputConfig,
    FileSelectionConfig, FileStoreConfig,
};
pub use logging::JsonlSelectionLogger;
pub use store::{EventRecord, InMemoryStore, JsonSnapshotStore, SnapshotFile};
