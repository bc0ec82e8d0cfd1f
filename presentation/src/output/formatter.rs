//! Output formatter trait

use super::console::ConsoleFormatter;
use super::json::JsonFormatter;
use marquee_application::{CastVoteOutput, SelectionRun};
use marquee_domain::{Decision, EventId, Nomination, OutputFormat, RankedEntry, ScoringMethod};

/// Trait for rendering command results
pub trait OutputFormatter {
    /// A ranked leaderboard
    fn ranking(&self, entries: &[RankedEntry], scoring: ScoringMethod, filtered: bool) -> String;

    /// The result of any selection method
    fn selection(&self, run: &SelectionRun, nominations: &[Nomination]) -> String;

    /// An event's stored decision (or its absence)
    fn decision(
        &self,
        event_id: &EventId,
        decision: Option<&Decision>,
        nominations: &[Nomination],
    ) -> String;

    /// What a vote toggle did
    fn vote(&self, output: &CastVoteOutput) -> String;
}

/// Formatter for the configured output format
pub fn formatter_for(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(ConsoleFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}
