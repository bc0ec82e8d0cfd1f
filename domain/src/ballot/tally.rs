//! Vote tally
//!
//! Folds the raw vote rows of an event into per-nomination counts.
//!
//! Matching rules:
//! - a vote with a `nomination_id` attaches to that nomination, or is an
//!   orphan (ignored) if the nomination is gone
//! - a legacy vote without a `nomination_id` attaches by movie id; when several
//!   live nominations share a movie, the last one wins
//! - one vote per (nomination, voter): the highest revision counts, ties go
//!   to the later row

use super::vote::{Reaction, Vote};
use crate::core::ids::{MovieId, NominationId, UserId};
use crate::event::nomination::Nomination;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reaction counts for one nomination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    pub superlike_count: u32,
    pub like_count: u32,
    pub dislike_count: u32,
}

impl Tally {
    pub fn new(superlike_count: u32, like_count: u32, dislike_count: u32) -> Self {
        Self {
            superlike_count,
            like_count,
            dislike_count,
        }
    }

    pub fn total(&self) -> u32 {
        self.superlike_count + self.like_count + self.dislike_count
    }

    fn record(&mut self, reaction: Reaction) {
        match reaction {
            Reaction::Superlike => self.superlike_count += 1,
            Reaction::Like => self.like_count += 1,
            Reaction::Dislike => self.dislike_count += 1,
        }
    }
}

/// Who reacted how to a nomination
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoteBreakdown {
    pub superlikes: Vec<UserId>,
    pub likes: Vec<UserId>,
    pub dislikes: Vec<UserId>,
}

impl VoteBreakdown {
    fn record(&mut self, reaction: Reaction, voter: UserId) {
        match reaction {
            Reaction::Superlike => self.superlikes.push(voter),
            Reaction::Like => self.likes.push(voter),
            Reaction::Dislike => self.dislikes.push(voter),
        }
    }

    /// The reaction a given voter holds, if any
    pub fn reaction_of(&self, voter: &UserId) -> Option<Reaction> {
        if self.superlikes.contains(voter) {
            Some(Reaction::Superlike)
        } else if self.likes.contains(voter) {
            Some(Reaction::Like)
        } else if self.dislikes.contains(voter) {
            Some(Reaction::Dislike)
        } else {
            None
        }
    }
}

/// A nomination together with its tally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NominationTally {
    pub nomination: Nomination,
    pub tally: Tally,
    pub breakdown: VoteBreakdown,
}

struct VoteIndex<'a> {
    by_nomination: HashMap<&'a NominationId, usize>,
    by_movie: HashMap<&'a MovieId, usize>,
}

impl<'a> VoteIndex<'a> {
    fn new(nominations: &'a [Nomination]) -> Self {
        let mut by_nomination = HashMap::with_capacity(nominations.len());
        let mut by_movie = HashMap::new();
        for (idx, nom) in nominations.iter().enumerate() {
            by_nomination.insert(&nom.id, idx);
            if let Some(movie) = nom.movie_id() {
                // later nominations of the same movie overwrite earlier ones
                by_movie.insert(movie, idx);
            }
        }
        Self {
            by_nomination,
            by_movie,
        }
    }

    fn resolve(&self, vote: &Vote) -> Option<usize> {
        match (&vote.nomination_id, &vote.movie_id) {
            (Some(nomination_id), _) => self.by_nomination.get(nomination_id).copied(),
            (None, Some(movie_id)) => self.by_movie.get(movie_id).copied(),
            (None, None) => None,
        }
    }
}

/// Tally every nomination, in nomination order
pub fn tally_votes(nominations: &[Nomination], votes: &[Vote]) -> Vec<NominationTally> {
    let index = VoteIndex::new(nominations);

    // (nomination index, voter) -> (row position, vote)
    let mut latest: HashMap<(usize, &UserId), (usize, &Vote)> = HashMap::new();
    for (pos, vote) in votes.iter().enumerate() {
        let Some(idx) = index.resolve(vote) else {
            continue;
        };
        latest
            .entry((idx, &vote.voter))
            .and_modify(|slot| {
                if vote.revision >= slot.1.revision {
                    *slot = (pos, vote);
                }
            })
            .or_insert((pos, vote));
    }

    let mut counted: Vec<(usize, usize, &Vote)> = latest
        .into_iter()
        .map(|((idx, _), (pos, vote))| (pos, idx, vote))
        .collect();
    counted.sort_by_key(|(pos, _, _)| *pos);

    let mut result: Vec<NominationTally> = nominations
        .iter()
        .map(|nomination| NominationTally {
            nomination: nomination.clone(),
            tally: Tally::default(),
            breakdown: VoteBreakdown::default(),
        })
        .collect();

    for (_, idx, vote) in counted {
        let entry = &mut result[idx];
        entry.tally.record(vote.reaction);
        entry.breakdown.record(vote.reaction, vote.voter.clone());
    }

    result
}

/// The nomination each vote row counts toward, row for row
///
/// Orphans map to `None`. Stores use this to find the rows a voter's
/// reaction lives in, legacy rows included.
pub fn vote_targets<'a>(
    nominations: &'a [Nomination],
    votes: &[Vote],
) -> Vec<Option<&'a NominationId>> {
    let index = VoteIndex::new(nominations);
    votes
        .iter()
        .map(|v| index.resolve(v).map(|idx| &nominations[idx].id))
        .collect()
}

/// Number of vote rows that match no live nomination
pub fn count_orphans(nominations: &[Nomination], votes: &[Vote]) -> usize {
    let index = VoteIndex::new(nominations);
    votes.iter().filter(|v| index.resolve(v).is_none()).count()
}
