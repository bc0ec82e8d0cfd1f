//! Cast Vote use case
//!
//! Pressing a reaction toggles it: the same reaction again retracts the vote,
//! a different one replaces it.

use crate::ports::ballot_box::BallotBox;
use crate::ports::selection_store::{SelectionStore, StoreError};
use marquee_domain::{
    EventId, NominationId, Reaction, SelectionError, UserId, Vote, VoteMutation, tally_votes,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum CastVoteError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

#[derive(Debug, Clone)]
pub struct CastVoteInput {
    pub event_id: EventId,
    pub nomination_id: NominationId,
    pub voter: UserId,
    pub reaction: Reaction,
}

impl CastVoteInput {
    pub fn new(
        event_id: impl Into<EventId>,
        nomination_id: impl Into<NominationId>,
        voter: impl Into<UserId>,
        reaction: Reaction,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            nomination_id: nomination_id.into(),
            voter: voter.into(),
            reaction,
        }
    }
}

/// What the toggle did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CastVoteOutput {
    pub mutation: VoteMutation,
    /// The stored row after an upsert
    pub vote: Option<Vote>,
}

pub struct CastVoteUseCase<S: SelectionStore + BallotBox + ?Sized + 'static> {
    store: Arc<S>,
}

impl<S: SelectionStore + BallotBox + ?Sized + 'static> CastVoteUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, input: CastVoteInput) -> Result<CastVoteOutput, CastVoteError> {
        let nominations = self.store.list_nominations(&input.event_id).await?;
        let Some(position) = nominations.iter().position(|n| n.id == input.nomination_id) else {
            return Err(SelectionError::NominationNotFound(input.nomination_id).into());
        };

        // the tally resolves legacy rows and duplicates the same way rankings do
        let votes = self.store.list_votes(&input.event_id).await?;
        let tallies = tally_votes(&nominations, &votes);
        let current = tallies[position].breakdown.reaction_of(&input.voter);

        let mutation = VoteMutation::resolve(current, input.reaction);
        let vote = match mutation {
            VoteMutation::Upsert(reaction) => Some(
                self.store
                    .upsert_vote(&input.event_id, &input.nomination_id, &input.voter, reaction)
                    .await?,
            ),
            VoteMutation::Retract => {
                self.store
                    .delete_vote(&input.event_id, &input.nomination_id, &input.voter)
                    .await?;
                None
            }
        };

        info!(
            "{} on {} by {}: {:?}",
            input.reaction, input.nomination_id, input.voter, mutation
        );

        Ok(CastVoteOutput { mutation, vote })
    }
}
