//! Run Selection use case
//!
//! Turns the current ballot into a pick using one of the selection methods.
//! Nothing is written here; the caller commits the result through
//! [`FinalizeDecisionUseCase`](super::finalize_decision::FinalizeDecisionUseCase).
//!
//! | Method | Pool | Procedure |
//! |--------|------|-----------|
//! | `score` / `loved` / `approval` | ranked nominations | ranked reveal |
//! | `battle` | ranked nominations | [`BattleRoyale`] |
//! | `roulette` | ranked nominations | [`spin_roulette`] |
//! | `decider` | attendee roster | [`spin_roulette`] over people |

use super::compute_ranking::{ComputeRankingError, ComputeRankingInput, ComputeRankingUseCase};
use crate::config::SelectionConfig;
use crate::ports::selection_log::{NoSelectionLogger, SelectionEvent, SelectionLogger};
use crate::ports::selection_store::{SelectionStore, StoreError};
use marquee_domain::{
    AttendeeRoster, BattleRoyale, Decision, EventId, Person, RankedEntry, RosterSource,
    SelectionError, SelectionMethod, SelectionRng, SpinLog, TournamentOutcome, spin_roulette,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum RunSelectionError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

impl From<ComputeRankingError> for RunSelectionError {
    fn from(err: ComputeRankingError) -> Self {
        match err {
            ComputeRankingError::Store(e) => RunSelectionError::Store(e),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunSelectionInput {
    pub event_id: EventId,
    pub method: SelectionMethod,
    pub filter_dislikes: bool,
    /// Fixed seed for a reproducible run
    pub seed: Option<u64>,
    pub runoff_alternations: usize,
}

impl RunSelectionInput {
    pub fn new(event_id: impl Into<EventId>, config: &SelectionConfig) -> Self {
        Self {
            event_id: event_id.into(),
            method: config.method,
            filter_dislikes: config.filter_dislikes,
            seed: config.seed,
            runoff_alternations: config.runoff_alternations,
        }
    }

    pub fn with_method(mut self, method: SelectionMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// What a selection method produced
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionOutcome {
    /// Ranked reveal; the podium entries are the offered picks
    Ranked { entries: Vec<RankedEntry> },
    Tournament(TournamentOutcome),
    Roulette {
        winner: RankedEntry,
        spin: SpinLog,
        pool: Vec<RankedEntry>,
    },
    Decider {
        decider: Person,
        spin: SpinLog,
        pool: Vec<Person>,
        source: RosterSource,
    },
}

/// A finished selection run
#[derive(Debug, Clone, Serialize)]
pub struct SelectionRun {
    pub event_id: EventId,
    pub method: SelectionMethod,
    /// Seed that replays this run
    pub seed: u64,
    /// Decision already stored for the event, if any
    pub existing_decision: Option<Decision>,
    pub outcome: SelectionOutcome,
}

pub struct RunSelectionUseCase<S: SelectionStore + ?Sized + 'static> {
    store: Arc<S>,
    ranking: ComputeRankingUseCase<S>,
    logger: Arc<dyn SelectionLogger>,
}

impl<S: SelectionStore + ?Sized + 'static> RunSelectionUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            ranking: ComputeRankingUseCase::new(store.clone()),
            store,
            logger: Arc::new(NoSelectionLogger),
        }
    }

    pub fn with_selection_logger(mut self, logger: Arc<dyn SelectionLogger>) -> Self {
        self.ranking = self.ranking.with_selection_logger(logger.clone());
        self.logger = logger;
        self
    }

    pub async fn execute(&self, input: RunSelectionInput) -> Result<SelectionRun, RunSelectionError> {
        let mut rng = SelectionRng::seeded_or_fresh(input.seed);
        info!(
            "Running {} for event {} (seed {})",
            input.method.description(),
            input.event_id,
            rng.seed()
        );

        let existing_decision = self.store.current_decision(&input.event_id).await?;
        if let Some(decision) = &existing_decision {
            debug!(
                "Event {} already decided on {}",
                input.event_id, decision.nomination_id
            );
        }

        let outcome = match input.method {
            SelectionMethod::Ranked(scoring) => {
                let entries = self.ranked_pool(&input, scoring).await?;
                SelectionOutcome::Ranked { entries }
            }
            SelectionMethod::BattleRoyale => {
                let pool = self.ranked_pool(&input, input.method.scoring()).await?;
                let outcome = BattleRoyale::new(pool.iter().map(|e| e.to_tally()).collect(), &mut rng)?
                    .with_alternations(input.runoff_alternations)
                    .run_to_end();
                self.log_tournament(&input, rng.seed(), &outcome);
                SelectionOutcome::Tournament(outcome)
            }
            SelectionMethod::MovieRoulette => {
                let pool = self.ranked_pool(&input, input.method.scoring()).await?;
                let (winner, spin) = spin_roulette(&pool, &mut rng)?;
                let winner = winner.clone();
                self.logger.log(SelectionEvent::new(
                    "roulette_spun",
                    json!({
                        "event_id": input.event_id,
                        "seed": rng.seed(),
                        "pool": pool.iter().map(|e| &e.nomination.id).collect::<Vec<_>>(),
                        "winner": winner.nomination.id,
                        "ticks": spin.ticks.len(),
                    }),
                ));
                SelectionOutcome::Roulette { winner, spin, pool }
            }
            SelectionMethod::DeciderRoulette => {
                let roster = self.roster(&input.event_id).await?;
                if roster.is_empty() {
                    return Err(SelectionError::NoAttendees.into());
                }
                let (decider, spin) = spin_roulette(roster.people(), &mut rng)?;
                let decider = decider.clone();
                self.logger.log(SelectionEvent::new(
                    "decider_picked",
                    json!({
                        "event_id": input.event_id,
                        "seed": rng.seed(),
                        "roster_source": roster.source(),
                        "decider": decider.id,
                    }),
                ));
                SelectionOutcome::Decider {
                    decider,
                    spin,
                    source: roster.source(),
                    pool: roster.people().to_vec(),
                }
            }
        };

        Ok(SelectionRun {
            event_id: input.event_id,
            method: input.method,
            seed: rng.seed(),
            existing_decision,
            outcome,
        })
    }

    async fn ranked_pool(
        &self,
        input: &RunSelectionInput,
        scoring: marquee_domain::ScoringMethod,
    ) -> Result<Vec<RankedEntry>, RunSelectionError> {
        let ranking_input = ComputeRankingInput::new(input.event_id.clone(), scoring)
            .with_filter_dislikes(input.filter_dislikes);
        Ok(self.ranking.execute(&ranking_input).await?)
    }

    /// Attendees, or group members when the event has no attendee records
    pub async fn roster(&self, event_id: &EventId) -> Result<AttendeeRoster, StoreError> {
        let attendees = self.store.list_attendees(event_id).await?;
        let members = if attendees.is_empty() {
            self.store.list_group_members(event_id).await?
        } else {
            Vec::new()
        };
        Ok(AttendeeRoster::from_sources(attendees, members))
    }

    fn log_tournament(&self, input: &RunSelectionInput, seed: u64, outcome: &TournamentOutcome) {
        info!(
            "Battle royale for event {} crowned {} after {} elimination(s)",
            input.event_id,
            outcome.winner.nomination.id,
            outcome.elimination_steps()
        );
        self.logger.log(SelectionEvent::new(
            "tournament_finished",
            json!({
                "event_id": input.event_id,
                "seed": seed,
                "winner": outcome.winner.nomination.id,
                "runner_up": outcome.runner_up.as_ref().map(|r| &r.nomination.id),
                "steps": outcome.steps,
            }),
        ));
    }
}
