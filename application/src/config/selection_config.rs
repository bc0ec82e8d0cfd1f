//! Selection parameters: how an event is decided.
//!
//! [`SelectionConfig`] is what the use cases see of the user's configuration.
//! The infrastructure layer builds it from the `[selection]` file section.

use marquee_domain::{DEFAULT_RUNOFF_ALTERNATIONS, ScoringMethod, SelectionMethod};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionConfig {
    /// Method used when a command does not name one
    pub method: SelectionMethod,
    /// Drop every nomination with a dislike before selecting
    pub filter_dislikes: bool,
    /// Runoff highlight alternations in a battle royale
    pub runoff_alternations: usize,
    /// Fixed seed; `None` draws a fresh one per run
    pub seed: Option<u64>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            method: SelectionMethod::default(),
            filter_dislikes: false,
            runoff_alternations: DEFAULT_RUNOFF_ALTERNATIONS,
            seed: None,
        }
    }
}

impl SelectionConfig {
    // ==================== Builder Methods ====================

    pub fn with_method(mut self, method: SelectionMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_filter_dislikes(mut self, filter: bool) -> Self {
        self.filter_dislikes = filter;
        self
    }

    pub fn with_runoff_alternations(mut self, alternations: usize) -> Self {
        self.runoff_alternations = alternations;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Scoring for leaderboards when the configured method is not a ranked one
    pub fn scoring(&self) -> ScoringMethod {
        self.method.scoring()
    }
}
