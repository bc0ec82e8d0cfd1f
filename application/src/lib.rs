//! Application layer for marquee
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::SelectionConfig;
pub use ports::{
    ballot_box::BallotBox,
    ranking_observer::{NoRankingObserver, RankingObserver, RankingSnapshot},
    selection_log::{NoSelectionLogger, SelectionEvent, SelectionLogger},
    selection_store::{SelectionStore, StoreError},
    vote_feed::{VoteChange, VoteChangeFeed, VoteChangeKind, VoteChangeStream},
};
pub use use_cases::cast_vote::{CastVoteError, CastVoteInput, CastVoteOutput, CastVoteUseCase};
pub use use_cases::compute_ranking::{
    ComputeRankingError, ComputeRankingInput, ComputeRankingUseCase,
};
pub use use_cases::finalize_decision::{FinalizeDecisionError, FinalizeDecisionUseCase};
pub use use_cases::live_sync::{LiveRankingHandle, LiveRankingSync, LiveSyncError, RankingView};
pub use use_cases::run_selection::{
    RunSelectionError, RunSelectionInput, RunSelectionUseCase, SelectionOutcome, SelectionRun,
};
