//! The committed outcome of an event

use crate::core::ids::{EventId, MovieId, NominationId};
use serde::{Deserialize, Serialize};

/// An event's selected nomination
///
/// At most one per event. Writing a new decision replaces the old one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub event_id: EventId,
    pub nomination_id: NominationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<MovieId>,
}

impl Decision {
    pub fn new(
        event_id: impl Into<EventId>,
        nomination_id: impl Into<NominationId>,
        candidate_id: Option<MovieId>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            nomination_id: nomination_id.into(),
            candidate_id,
        }
    }
}
