//! Selection method catalogue
//!
//! How an event goes from a ballot to a single pick.

use super::scoring::ScoringMethod;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "scoring")]
pub enum SelectionMethod {
    /// Ranked reveal; the group picks from the podium
    Ranked(ScoringMethod),
    /// Elimination tournament with a finals runoff
    BattleRoyale,
    /// Uniform draw over the (optionally filtered) nominations
    MovieRoulette,
    /// Uniform draw over attendees; the drawn person decides
    DeciderRoulette,
}

impl Default for SelectionMethod {
    fn default() -> Self {
        SelectionMethod::Ranked(ScoringMethod::default())
    }
}

impl SelectionMethod {
    /// All CLI / config names
    pub const NAMES: [&'static str; 6] = ["score", "loved", "approval", "battle", "roulette", "decider"];

    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMethod::Ranked(ScoringMethod::WeightedScore) => "score",
            SelectionMethod::Ranked(ScoringMethod::MostLoved) => "loved",
            SelectionMethod::Ranked(ScoringMethod::Approval) => "approval",
            SelectionMethod::Ranked(ScoringMethod::NetApproval) => "net_approval",
            SelectionMethod::BattleRoyale => "battle",
            SelectionMethod::MovieRoulette => "roulette",
            SelectionMethod::DeciderRoulette => "decider",
        }
    }

    pub fn description(&self) -> String {
        match self {
            SelectionMethod::Ranked(scoring) => format!("ranked reveal by {}", scoring.description()),
            SelectionMethod::BattleRoyale => "battle royale elimination".to_string(),
            SelectionMethod::MovieRoulette => "movie roulette".to_string(),
            SelectionMethod::DeciderRoulette => "decider roulette".to_string(),
        }
    }

    /// Scoring used to order the pool before the method runs
    pub fn scoring(&self) -> ScoringMethod {
        match self {
            SelectionMethod::Ranked(scoring) => *scoring,
            _ => ScoringMethod::WeightedScore,
        }
    }

    /// Whether the pool is people rather than nominations
    pub fn draws_people(&self) -> bool {
        matches!(self, SelectionMethod::DeciderRoulette)
    }
}

impl std::fmt::Display for SelectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SelectionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "battle" | "battle_royale" => Ok(SelectionMethod::BattleRoyale),
            "roulette" | "movie_roulette" => Ok(SelectionMethod::MovieRoulette),
            "decider" | "decider_roulette" => Ok(SelectionMethod::DeciderRoulette),
            other => other
                .parse::<ScoringMethod>()
                .map(SelectionMethod::Ranked)
                .map_err(|_| {
                    format!(
                        "Unknown selection method: {}. Valid: {}",
                        s,
                        Self::NAMES.join(", ")
                    )
                }),
        }
    }
}
