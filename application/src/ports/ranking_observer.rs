//! Ranking observer port
//!
//! Receives every ranking the live sync publishes. Implementations live in
//! the presentation layer (leaderboard redraw, JSON lines, ...).

use marquee_domain::{EventId, RankedEntry, ScoringMethod};
use serde::Serialize;

/// A published ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingSnapshot {
    pub event_id: EventId,
    pub scoring: ScoringMethod,
    pub filter_dislikes: bool,
    pub entries: Vec<RankedEntry>,
    /// Increases by one per successful refresh
    pub generation: u64,
}

pub trait RankingObserver: Send + Sync {
    fn on_ranking(&self, snapshot: &RankingSnapshot);

    /// A refresh failed; the previous ranking stays current
    fn on_refresh_failed(&self, _error: &str) {}
}

/// No-op observer for when only the watch channel is used
pub struct NoRankingObserver;

impl RankingObserver for NoRankingObserver {
    fn on_ranking(&self, _snapshot: &RankingSnapshot) {}
}
