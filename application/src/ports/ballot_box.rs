//! Ballot box port
//!
//! Vote writes. One vote per (nomination, voter); an upsert replaces the
//! voter's previous reaction.

use super::selection_store::StoreError;
use async_trait::async_trait;
use marquee_domain::{EventId, NominationId, Reaction, UserId, Vote};

#[async_trait]
pub trait BallotBox: Send + Sync {
    /// Insert or replace the voter's vote, returning the stored row
    async fn upsert_vote(
        &self,
        event_id: &EventId,
        nomination_id: &NominationId,
        voter: &UserId,
        reaction: Reaction,
    ) -> Result<Vote, StoreError>;

    /// Remove the voter's vote; removing a missing vote is not an error
    async fn delete_vote(
        &self,
        event_id: &EventId,
        nomination_id: &NominationId,
        voter: &UserId,
    ) -> Result<(), StoreError>;
}
