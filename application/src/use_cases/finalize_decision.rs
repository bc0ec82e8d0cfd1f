//! Finalize Decision use case
//!
//! Commits a chosen nomination as the event's outcome. Selecting is idempotent:
//! writing the same decision twice leaves one identical stored decision.
//! Concurrent selections are not serialized; the store keeps the last write.

use crate::ports::selection_log::{NoSelectionLogger, SelectionEvent, SelectionLogger};
use crate::ports::selection_store::{SelectionStore, StoreError};
use marquee_domain::{Decision, EventId, MovieId, NominationId, SelectionError};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum FinalizeDecisionError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

pub struct FinalizeDecisionUseCase<S: SelectionStore + ?Sized + 'static> {
    store: Arc<S>,
    logger: Arc<dyn SelectionLogger>,
}

impl<S: SelectionStore + ?Sized + 'static> FinalizeDecisionUseCase<S> {
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

    /// Store `nomination_id` as the event's pick
    ///
    /// Without an explicit candidate the nomination's own movie is recorded.
    pub async fn select(
        &self,
        event_id: &EventId,
        nomination_id: &NominationId,
        candidate_id: Option<MovieId>,
    ) -> Result<Decision, FinalizeDecisionError> {
        let nominations = self.store.list_nominations(event_id).await?;
        let nomination = nominations
            .iter()
            .find(|n| &n.id == nomination_id)
            .ok_or_else(|| SelectionError::NominationNotFound(nomination_id.clone()))?;

        let candidate_id = candidate_id.or_else(|| nomination.movie_id().cloned());
        let decision = Decision::new(event_id.clone(), nomination_id.clone(), candidate_id);
        self.store.write_decision(&decision).await?;

        info!(
            "Event {} decided: {} ({})",
            event_id,
            nomination.display_title(),
            nomination_id
        );
        self.logger.log(SelectionEvent::new(
            "decision_written",
            json!({
                "event_id": decision.event_id,
                "nomination_id": decision.nomination_id,
                "candidate_id": decision.candidate_id,
            }),
        ));

        Ok(decision)
    }

    /// Remove the event's decision so it can be chosen again
    pub async fn clear(&self, event_id: &EventId) -> Result<(), FinalizeDecisionError> {
        self.store.clear_decision(event_id).await?;
        info!("Event {} decision cleared", event_id);
        self.logger.log(SelectionEvent::new(
            "decision_cleared",
            json!({ "event_id": event_id }),
        ));
        Ok(())
    }

    pub async fn current(&self, event_id: &EventId) -> Result<Option<Decision>, FinalizeDecisionError> {
        Ok(self.store.current_decision(event_id).await?)
    }
}
