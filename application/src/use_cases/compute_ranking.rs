//! Compute Ranking use case
//!
//! Reads a fresh snapshot of the ballot and ranks it. Every caller (ranked
//! reveal, live sync, selection runner) goes through here, so a ranking always
//! reflects the store at the time of the call.

use crate::ports::selection_log::{NoSelectionLogger, SelectionEvent, SelectionLogger};
use crate::ports::selection_store::{SelectionStore, StoreError};
use marquee_domain::{
    EventId, NominationTally, RankedEntry, ScoringMethod, count_orphans, rank_tallies, tally_votes,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ComputeRankingError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct ComputeRankingInput {
    pub event_id: EventId,
    pub scoring: ScoringMethod,
    pub filter_dislikes: bool,
}

impl ComputeRankingInput {
    pub fn new(event_id: impl Into<EventId>, scoring: ScoringMethod) -> Self {
        Self {
            event_id: event_id.into(),
            scoring,
            filter_dislikes: false,
        }
    }

    pub fn with_filter_dislikes(mut self, filter: bool) -> Self {
        self.filter_dislikes = filter;
        self
    }
}

pub struct ComputeRankingUseCase<S: SelectionStore + ?Sized + 'static> {
    store: Arc<S>,
    logger: Arc<dyn SelectionLogger>,
}

impl<S: SelectionStore + ?Sized + 'static> Clone for ComputeRankingUseCase<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            logger: self.logger.clone(),
        }
    }
}

impl<S: SelectionStore + ?Sized + 'static> ComputeRankingUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            logger: Arc::new(NoSelectionLogger),
        }
    }

    pub fn with_selection_logger(mut self, logger: Arc<dyn SelectionLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Tally every live nomination, unfiltered and unranked
    pub async fn tally(&self, event_id: &EventId) -> Result<Vec<NominationTally>, ComputeRankingError> {
        let nominations = self.store.list_nominations(event_id).await?;
        let votes = self.store.list_votes(event_id).await?;

        let orphans = count_orphans(&nominations, &votes);
        if orphans > 0 {
            debug!("Ignoring {} orphaned vote(s) for event {}", orphans, event_id);
        }

        Ok(tally_votes(&nominations, &votes))
    }

    pub async fn execute(
        &self,
        input: &ComputeRankingInput,
    ) -> Result<Vec<RankedEntry>, ComputeRankingError> {
        let tallies = self.tally(&input.event_id).await?;
        let nominated = tallies.len();
        let ranking = rank_tallies(tallies, input.scoring, input.filter_dislikes);

        info!(
            "Ranked {} of {} nomination(s) for event {} by {}",
            ranking.len(),
            nominated,
            input.event_id,
            input.scoring
        );

        self.logger.log(SelectionEvent::new(
            "ranking_computed",
            json!({
                "event_id": input.event_id,
                "scoring": input.scoring,
                "filter_dislikes": input.filter_dislikes,
                "ranking": ranking
                    .iter()
                    .map(|e| json!({
                        "rank": e.rank,
                        "nomination_id": e.nomination.id,
                        "score": e.score,
                    }))
                    .collect::<Vec<_>>(),
            }),
        ));

        Ok(ranking)
    }
}
