//! Votes and the toggle rule for casting them

use crate::core::ids::{MovieId, NominationId, UserId};
use serde::{Deserialize, Serialize};

/// A voter's reaction to a nomination
///
/// Stored numerically: dislike `-2`, like `1`, superlike `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Reaction {
    Dislike,
    Like,
    Superlike,
}

impl Reaction {
    pub fn code(&self) -> i8 {
        match self {
            Reaction::Dislike => -2,
            Reaction::Like => 1,
            Reaction::Superlike => 2,
        }
    }

    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            -2 => Some(Reaction::Dislike),
            1 => Some(Reaction::Like),
            2 => Some(Reaction::Superlike),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Reaction::Dislike => "dislike",
            Reaction::Like => "like",
            Reaction::Superlike => "superlike",
        }
    }
}

impl TryFrom<i8> for Reaction {
    type Error = String;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        Reaction::from_code(code).ok_or_else(|| format!("Unknown reaction code: {}", code))
    }
}

impl From<Reaction> for i8 {
    fn from(reaction: Reaction) -> Self {
        reaction.code()
    }
}

impl std::fmt::Display for Reaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Reaction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dislike" | "down" | "-2" => Ok(Reaction::Dislike),
            "like" | "up" | "1" => Ok(Reaction::Like),
            "superlike" | "love" | "2" => Ok(Reaction::Superlike),
            _ => Err(format!(
                "Unknown reaction: {}. Valid: dislike, like, superlike",
                s
            )),
        }
    }
}

/// A single vote row as the store reports it
///
/// Older rows predate nominations and only carry `movie_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nomination_id: Option<NominationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_id: Option<MovieId>,
    pub voter: UserId,
    #[serde(rename = "vote_type")]
    pub reaction: Reaction,
    /// Store-assigned, monotonic per write
    #[serde(default)]
    pub revision: u64,
}

impl Vote {
    pub fn new(
        nomination_id: impl Into<NominationId>,
        voter: impl Into<UserId>,
        reaction: Reaction,
    ) -> Self {
        Self {
            nomination_id: Some(nomination_id.into()),
            movie_id: None,
            voter: voter.into(),
            reaction,
            revision: 0,
        }
    }

    /// A row that predates nominations and is matched by movie
    pub fn legacy(movie_id: impl Into<MovieId>, voter: impl Into<UserId>, reaction: Reaction) -> Self {
        Self {
            nomination_id: None,
            movie_id: Some(movie_id.into()),
            voter: voter.into(),
            reaction,
            revision: 0,
        }
    }

    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }
}

/// What to do with a voter's ballot when they press a reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "reaction", rename_all = "snake_case")]
pub enum VoteMutation {
    Upsert(Reaction),
    Retract,
}

impl VoteMutation {
    /// Pressing the reaction already held retracts it; anything else replaces it.
    pub fn resolve(current: Option<Reaction>, cast: Reaction) -> Self {
        match current {
            Some(existing) if existing == cast => VoteMutation::Retract,
            _ => VoteMutation::Upsert(cast),
        }
    }
}
