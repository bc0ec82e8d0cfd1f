//! Logging infrastructure: structured selection audit logging.
//!
//! Provides [`JsonlSelectionLogger`], a JSONL file writer that implements
//! the [`SelectionLogger`](marquee_application::SelectionLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlSelectionLogger;
