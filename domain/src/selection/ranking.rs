//! Ranker
//!
//! Orders tallied nominations under a [`ScoringMethod`]. The sort is stable, so
//! nominations with equal scores keep their insertion order.

use super::scoring::ScoringMethod;
use crate::ballot::tally::{NominationTally, Tally, VoteBreakdown, tally_votes};
use crate::ballot::vote::Vote;
use crate::event::nomination::Nomination;
use serde::{Deserialize, Serialize};

/// Ranks offered as "watch this" picks on a ranked reveal
pub const PODIUM_SIZE: usize = 3;

/// One row of a ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// 1-based
    pub rank: usize,
    pub nomination: Nomination,
    pub tally: Tally,
    pub breakdown: VoteBreakdown,
    pub score: i64,
}

impl RankedEntry {
    pub fn is_podium(&self) -> bool {
        self.rank <= PODIUM_SIZE
    }

    /// Back to the tally form used by the tournament and roulette
    pub fn to_tally(&self) -> NominationTally {
        NominationTally {
            nomination: self.nomination.clone(),
            tally: self.tally,
            breakdown: self.breakdown.clone(),
        }
    }
}

/// Drop every nomination that received at least one dislike
pub fn filter_disliked(tallies: Vec<NominationTally>) -> Vec<NominationTally> {
    tallies
        .into_iter()
        .filter(|t| t.tally.dislike_count == 0)
        .collect()
}

/// Rank already-tallied nominations
pub fn rank_tallies(
    tallies: Vec<NominationTally>,
    method: ScoringMethod,
    filter_dislikes: bool,
) -> Vec<RankedEntry> {
    let pool = if filter_dislikes {
        filter_disliked(tallies)
    } else {
        tallies
    };

    let mut scored: Vec<(i64, NominationTally)> = pool
        .into_iter()
        .map(|t| (method.score(&t.tally), t))
        .collect();
    // Vec::sort_by is stable
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .enumerate()
        .map(|(i, (score, t))| RankedEntry {
            rank: i + 1,
            nomination: t.nomination,
            tally: t.tally,
            breakdown: t.breakdown,
            score,
        })
        .collect()
}

/// Tally and rank in one pass
///
/// # Example
///
/// ```
/// use marquee_domain::{Nomination, Reaction, ScoringMethod, Vote, compute_ranking};
///
/// let noms = vec![
///     Nomination::movie("n1", "e1", "m1", "alice"),
///     Nomination::movie("n2", "e1", "m2", "bob"),
/// ];
/// let votes = vec![
///     Vote::new("n1", "alice", Reaction::Superlike),
///     Vote::new("n1", "bob", Reaction::Dislike),
///     Vote::new("n2", "alice", Reaction::Like),
///     Vote::new("n2", "bob", Reaction::Like),
/// ];
///
/// let ranked = compute_ranking(&noms, &votes, ScoringMethod::WeightedScore, false);
/// assert_eq!(ranked[0].nomination.id.as_str(), "n2");
///
/// let filtered = compute_ranking(&noms, &votes, ScoringMethod::WeightedScore, true);
/// assert_eq!(filtered.len(), 1);
/// ```
pub fn compute_ranking(
    nominations: &[Nomination],
    votes: &[Vote],
    method: ScoringMethod,
    filter_dislikes: bool,
) -> Vec<RankedEntry> {
    rank_tallies(tally_votes(nominations, votes), method, filter_dislikes)
}
