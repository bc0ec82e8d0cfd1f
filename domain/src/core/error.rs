//! Domain error types

use crate::core::ids::NominationId;
use thiserror::Error;

/// Selection-level errors
///
/// All of these are local, recoverable conditions: the caller is expected to
/// show a message and refuse to start the flow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("No candidates available to choose from")]
    EmptyPool,

    #[error("Nomination not found: {0}")]
    NominationNotFound(NominationId),

    #[error("No attendees available to act as decider")]
    NoAttendees,
}

impl SelectionError {
    /// Check if this error means there was nothing to pick from
    pub fn is_empty_pool(&self) -> bool {
        matches!(self, SelectionError::EmptyPool | SelectionError::NoAttendees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pool_display() {
        let error = SelectionError::EmptyPool;
        assert_eq!(error.to_string(), "No candidates available to choose from");
    }

    #[test]
    fn test_nomination_not_found_display() {
        let error = SelectionError::NominationNotFound(NominationId::new("nom-9"));
        assert_eq!(error.to_string(), "Nomination not found: nom-9");
    }

    #[test]
    fn test_is_empty_pool_check() {
        assert!(SelectionError::EmptyPool.is_empty_pool());
        assert!(SelectionError::NoAttendees.is_empty_pool());
        assert!(!SelectionError::NominationNotFound(NominationId::new("x")).is_empty_pool());
    }
}
