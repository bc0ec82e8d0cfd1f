//! Selection store port
//!
//! The hosted relational store is an opaque collaborator. The engine only
//! reads an event's ballot and writes back a single decision.

use async_trait::async_trait;
use marquee_domain::{Decision, EventId, Nomination, Person, Vote};
use thiserror::Error;

/// Errors reported by store adapters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Corrupt data: {0}")]
    Corrupt(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Read access to an event's ballot plus the decision write-back
///
/// Implementations live in the infrastructure layer.
#[async_trait]
pub trait SelectionStore: Send + Sync {
    /// Live nominations, in the store's insertion order
    async fn list_nominations(&self, event_id: &EventId) -> Result<Vec<Nomination>, StoreError>;

    /// Every vote row for the event, including legacy and orphaned rows
    async fn list_votes(&self, event_id: &EventId) -> Result<Vec<Vote>, StoreError>;

    async fn list_attendees(&self, event_id: &EventId) -> Result<Vec<Person>, StoreError>;

    /// Members of the event's group; empty when the event has no group
    async fn list_group_members(&self, event_id: &EventId) -> Result<Vec<Person>, StoreError>;

    async fn current_decision(&self, event_id: &EventId) -> Result<Option<Decision>, StoreError>;

    /// Upsert keyed by event id; the last write wins
    async fn write_decision(&self, decision: &Decision) -> Result<(), StoreError>;

    async fn clear_decision(&self, event_id: &EventId) -> Result<(), StoreError>;
}
