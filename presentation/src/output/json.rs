//! JSON output: one pretty-printed document per command

use crate::output::formatter::OutputFormatter;
use marquee_application::{CastVoteOutput, SelectionRun};
use marquee_domain::{Decision, EventId, Nomination, RankedEntry, ScoringMethod};
use serde::Serialize;
use serde_json::json;

pub struct JsonFormatter;

impl JsonFormatter {
    pub fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn ranking(&self, entries: &[RankedEntry], scoring: ScoringMethod, filtered: bool) -> String {
        Self::to_json(&json!({
            "scoring": scoring,
            "filter_dislikes": filtered,
            "entries": entries,
        }))
    }

    fn selection(&self, run: &SelectionRun, _nominations: &[Nomination]) -> String {
        Self::to_json(run)
    }

    fn decision(
        &self,
        event_id: &EventId,
        decision: Option<&Decision>,
        _nominations: &[Nomination],
    ) -> String {
        Self::to_json(&json!({
            "event_id": event_id,
            "decision": decision,
        }))
    }

    fn vote(&self, output: &CastVoteOutput) -> String {
        Self::to_json(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_domain::{Reaction, Vote, VoteMutation};
    use serde_json::Value;

    #[test]
    fn test_decision_json() {
        let event = EventId::new("friday");
        let decision = Decision::new("friday", "n2", None);
        let value: Value =
            serde_json::from_str(&JsonFormatter.decision(&event, Some(&decision), &[])).unwrap();
        assert_eq!(value["event_id"], "friday");
        assert_eq!(value["decision"]["nomination_id"], "n2");

        let empty: Value = serde_json::from_str(&JsonFormatter.decision(&event, None, &[])).unwrap();
        assert!(empty["decision"].is_null());
    }

    #[test]
    fn test_vote_json() {
        let output = CastVoteOutput {
            mutation: VoteMutation::Upsert(Reaction::Superlike),
            vote: Some(Vote::new("n1", "ana", Reaction::Superlike).with_revision(3)),
        };
        let value: Value = serde_json::from_str(&JsonFormatter.vote(&output)).unwrap();
        assert_eq!(value["mutation"]["action"], "upsert");
        assert_eq!(value["mutation"]["reaction"], 2);
        assert_eq!(value["vote"]["vote_type"], 2);
    }

    #[test]
    fn test_empty_ranking_json() {
        let value: Value =
            serde_json::from_str(&JsonFormatter.ranking(&[], ScoringMethod::MostLoved, true)).unwrap();
        assert_eq!(value["entries"].as_array().map(|a| a.len()), Some(0));
        assert_eq!(value["filter_dislikes"], true);
    }
}
