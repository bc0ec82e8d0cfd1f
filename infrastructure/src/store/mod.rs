//! Store adapters
//!
//! - [`InMemoryStore`]: events held in process, push notifications
//! - [`JsonSnapshotStore`]: events in a JSON file, polled for changes

pub mod memory;
pub mod snapshot;

pub use memory::{EventRecord, InMemoryStore};
pub use snapshot::{DEFAULT_POLL_INTERVAL, JsonSnapshotStore, MIN_POLL_INTERVAL, SnapshotFile};
