//! Vote change feed port
//!
//! Realtime notification of vote mutations for one event. Notifications carry
//! no ballot data; subscribers re-read the store on every change.

use super::selection_store::StoreError;
use async_trait::async_trait;
use marquee_domain::{EventId, NominationId, UserId};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChangeKind {
    Inserted,
    Updated,
    Deleted,
    /// The feed may have missed changes; re-read everything
    Resync,
}

impl std::fmt::Display for VoteChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            VoteChangeKind::Inserted => "inserted",
            VoteChangeKind::Updated => "updated",
            VoteChangeKind::Deleted => "deleted",
            VoteChangeKind::Resync => "resync",
        };
        f.write_str(s)
    }
}

/// A single observed vote mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteChange {
    pub event_id: EventId,
    pub kind: VoteChangeKind,
    pub nomination_id: Option<NominationId>,
    pub voter: Option<UserId>,
}

impl VoteChange {
    pub fn new(
        event_id: EventId,
        kind: VoteChangeKind,
        nomination_id: Option<NominationId>,
        voter: UserId,
    ) -> Self {
        Self {
            event_id,
            kind,
            nomination_id,
            voter: Some(voter),
        }
    }

    /// A change that tells subscribers to re-read without naming a vote
    pub fn resync(event_id: EventId) -> Self {
        Self {
            event_id,
            kind: VoteChangeKind::Resync,
            nomination_id: None,
            voter: None,
        }
    }
}

/// Handle for receiving vote changes.
///
/// Wraps an `mpsc::Receiver<VoteChange>`. The stream ends when the feed side
/// is dropped.
pub struct VoteChangeStream {
    pub receiver: mpsc::Receiver<VoteChange>,
}

impl VoteChangeStream {
    pub fn new(receiver: mpsc::Receiver<VoteChange>) -> Self {
        Self { receiver }
    }

    /// Next change, or `None` once the feed closed
    pub async fn next(&mut self) -> Option<VoteChange> {
        self.receiver.recv().await
    }
}

#[async_trait]
pub trait VoteChangeFeed: Send + Sync {
    /// Start receiving changes for one event
    async fn subscribe(&self, event_id: &EventId) -> Result<VoteChangeStream, StoreError>;
}
