//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod cast_vote;
pub mod compute_ranking;
pub mod finalize_decision;
pub mod live_sync;
pub mod run_selection;
#[cfg(test)]
pub(crate) mod test_support;
