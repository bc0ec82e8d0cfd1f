//! Scoring policies
//!
//! Each policy maps a [`Tally`] to a comparable integer, higher is better.
//! All of them are total and return 0 for the empty tally.

use crate::ballot::tally::Tally;
use serde::{Deserialize, Serialize};

/// `2×superlike + like − 2×dislike`
pub fn weighted_score(tally: &Tally) -> i64 {
    2 * i64::from(tally.superlike_count) + i64::from(tally.like_count)
        - 2 * i64::from(tally.dislike_count)
}

/// Superlikes only
pub fn most_loved(tally: &Tally) -> i64 {
    i64::from(tally.superlike_count)
}

/// Superlikes plus likes
pub fn approval(tally: &Tally) -> i64 {
    i64::from(tally.superlike_count) + i64::from(tally.like_count)
}

/// Superlikes plus likes, minus dislikes
pub fn net_approval(tally: &Tally) -> i64 {
    approval(tally) - i64::from(tally.dislike_count)
}

/// Named scoring policy used by the ranker
///
/// # Example
///
/// ```
/// use marquee_domain::{ScoringMethod, Tally};
///
/// let tally = Tally::new(1, 2, 1);
/// assert_eq!(ScoringMethod::WeightedScore.score(&tally), 2);
/// assert_eq!(ScoringMethod::Approval.score(&tally), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMethod {
    #[default]
    WeightedScore,
    MostLoved,
    Approval,
    NetApproval,
}

impl ScoringMethod {
    pub fn score(&self, tally: &Tally) -> i64 {
        match self {
            ScoringMethod::WeightedScore => weighted_score(tally),
            ScoringMethod::MostLoved => most_loved(tally),
            ScoringMethod::Approval => approval(tally),
            ScoringMethod::NetApproval => net_approval(tally),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringMethod::WeightedScore => "weighted_score",
            ScoringMethod::MostLoved => "most_loved",
            ScoringMethod::Approval => "approval",
            ScoringMethod::NetApproval => "net_approval",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ScoringMethod::WeightedScore => "highest score (superlike 2, like 1, dislike -2)",
            ScoringMethod::MostLoved => "most superlikes",
            ScoringMethod::Approval => "most likes and superlikes",
            ScoringMethod::NetApproval => "likes and superlikes minus dislikes",
        }
    }
}

impl std::fmt::Display for ScoringMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ScoringMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "score" | "weighted" | "weighted_score" => Ok(ScoringMethod::WeightedScore),
            "loved" | "most_loved" => Ok(ScoringMethod::MostLoved),
            "approval" => Ok(ScoringMethod::Approval),
            "net" | "net_approval" => Ok(ScoringMethod::NetApproval),
            _ => Err(format!(
                "Unknown scoring method: {}. Valid: score, loved, approval, net_approval",
                s
            )),
        }
    }
}
