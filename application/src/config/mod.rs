//! Application-level configuration.
//!
//! - [`SelectionConfig`]: default method, dislike filter, runoff length, seed

pub mod selection_config;

pub use selection_config::SelectionConfig;
