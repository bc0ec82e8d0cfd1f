//! Core domain concepts shared across all subdomains.
//!
//! - [`ids`]: typed identifiers for events, nominations, movies and people
//! - [`error::SelectionError`]: domain-level errors

pub mod error;
pub mod ids;
