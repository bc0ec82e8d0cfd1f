//! Port for structured selection audit logging.
//!
//! Defines the [`SelectionLogger`] trait for recording what the engine
//! decided (rankings, tournament results, roulette spins, decisions) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures an audit trail
//! in a machine-readable format (JSONL) that includes the seeds needed to
//! replay random procedures.

use serde_json::Value;

/// A structured selection event for logging.
pub struct SelectionEvent {
    /// Event type identifier (e.g., "ranking_computed", "decision_written").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl SelectionEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging selection events to a structured log.
///
/// The `log` method is synchronous and non-fallible; logging failures are
/// silently ignored.
pub trait SelectionLogger: Send + Sync {
    fn log(&self, event: SelectionEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoSelectionLogger;

impl SelectionLogger for NoSelectionLogger {
    fn log(&self, _event: SelectionEvent) {}
}
