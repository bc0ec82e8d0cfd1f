//! Domain layer for marquee
//!
//! This crate contains the selection engine for group movie nights: entities,
//! value objects and the pure algorithms that turn a ballot into a pick.
//! It has no dependencies on infrastructure, async runtimes or presentation.
//!
//! # Core Concepts
//!
//! ## Ballot
//!
//! Members nominate movies and react to each nomination with a dislike, like
//! or superlike. [`tally_votes`] folds the raw vote rows into a [`Tally`] per
//! nomination.
//!
//! ## Selection
//!
//! - **Ranked reveal**: [`compute_ranking`] orders nominations under a
//!   [`ScoringMethod`], optionally dropping anything disliked
//! - **Battle Royale**: [`BattleRoyale`] eliminates from the bottom up and
//!   settles the top two in a runoff
//! - **Roulette**: [`spin_roulette`] draws uniformly, from nominations or from
//!   the [`AttendeeRoster`] in decider mode

pub mod ballot;
pub mod config;
pub mod core;
pub mod event;
pub mod selection;
pub mod util;

// Re-export commonly used types
pub use ballot::{
    tally::{NominationTally, Tally, VoteBreakdown, count_orphans, tally_votes, vote_targets},
    vote::{Reaction, Vote, VoteMutation},
};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{
    error::SelectionError,
    ids::{EventId, MovieId, NominationId, UserId},
};
pub use event::{
    decision::Decision,
    nomination::{Candidate, Nomination, NominationOrigin},
    roster::{AttendeeRoster, Person, RosterSource},
};
pub use selection::{
    method::SelectionMethod,
    ranking::{PODIUM_SIZE, RankedEntry, compute_ranking, filter_disliked, rank_tallies},
    rng::{SelectionRng, fresh_seed},
    roulette::{MIN_SPIN_CYCLES, SpinLog, pick_random, spin_roulette},
    scoring::{ScoringMethod, approval, most_loved, net_approval, weighted_score},
    tournament::{
        BattleRoyale, Contender, ContenderStatus, DEFAULT_RUNOFF_ALTERNATIONS, TournamentOutcome,
        TournamentPhase, TournamentStep, battle_score, decide_winner, normalize_alternations,
        run_tournament,
    },
};
