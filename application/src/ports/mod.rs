//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod ballot_box;
pub mod ranking_observer;
pub mod selection_log;
pub mod selection_store;
pub mod vote_feed;
