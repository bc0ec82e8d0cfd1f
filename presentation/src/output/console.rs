//! Console output formatter for selection results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use marquee_application::{CastVoteOutput, SelectionOutcome, SelectionRun};
use marquee_domain::util::truncate_title;
use marquee_domain::{
    Decision, EventId, Nomination, NominationId, Person, RankedEntry, RosterSource,
    ScoringMethod, SpinLog, TournamentOutcome, TournamentStep, VoteMutation,
};

const TITLE_WIDTH: usize = 32;

/// Formats selection results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Leaderboard table, podium highlighted
    pub fn format_ranking(entries: &[RankedEntry], scoring: ScoringMethod, filtered: bool) -> String {
        let mut output = String::new();

        let mut title = format!("Leaderboard: {}", scoring.description());
        if filtered {
            title.push_str(" (disliked hidden)");
        }
        output.push_str(&Self::header(&title));
        output.push('\n');

        if entries.is_empty() {
            output.push_str(&format!("\n{}\n", "No nominations to rank.".dimmed()));
            output.push_str(&Self::footer());
            return output;
        }

        output.push_str(&format!(
            "{:>3}  {:<width$}  {:>5}  {:>5}  {:>4}  {:>7}\n",
            "#",
            "Title",
            "Score",
            "Super",
            "Like",
            "Dislike",
            width = TITLE_WIDTH
        ));
        for entry in entries {
            output.push_str(&Self::ranking_row(entry));
            if let Some(venue) = entry.nomination.venue_summary() {
                output.push_str(&format!("     {}\n", format!("at {}", venue).dimmed()));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    fn ranking_row(entry: &RankedEntry) -> String {
        let title = format!(
            "{:<width$}",
            truncate_title(entry.nomination.display_title(), TITLE_WIDTH),
            width = TITLE_WIDTH
        );
        let rank = format!("{:>3}", entry.rank);
        let (rank, title) = match entry.rank {
            1 => (rank.yellow().bold(), title.yellow().bold()),
            2 | 3 => (rank.cyan().bold(), title.bold()),
            _ => (rank.normal(), title.normal()),
        };
        format!(
            "{}  {}  {:>5}  {:>5}  {:>4}  {:>7}\n",
            rank,
            title,
            entry.score,
            entry.tally.superlike_count,
            entry.tally.like_count,
            entry.tally.dislike_count
        )
    }

    /// Result of a selection run
    pub fn format_selection(run: &SelectionRun, nominations: &[Nomination]) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {} {}\n",
            "Method:".cyan().bold(),
            run.method.description(),
            format!("(seed {})", run.seed).dimmed()
        ));

        if let Some(existing) = &run.existing_decision {
            output.push_str(&format!(
                "{} event already decided on {}; finalizing replaces it\n",
                "note:".yellow().bold(),
                Self::title_of(&existing.nomination_id, nominations)
            ));
        }
        output.push('\n');

        match &run.outcome {
            SelectionOutcome::Ranked { entries } => {
                output.push_str(&Self::format_ranking(entries, run.method.scoring(), false));
                let podium: Vec<&str> = entries
                    .iter()
                    .filter(|e| e.is_podium())
                    .map(|e| e.nomination.display_title())
                    .collect();
                if !podium.is_empty() {
                    output.push_str(&format!(
                        "\n{} {}\n",
                        "Pick from the podium:".green().bold(),
                        podium.join(", ")
                    ));
                }
            }
            SelectionOutcome::Tournament(outcome) => {
                output.push_str(&Self::format_tournament(outcome));
            }
            SelectionOutcome::Roulette { winner, spin, pool } => {
                output.push_str(&Self::format_roulette(winner, spin, pool.len()));
            }
            SelectionOutcome::Decider {
                decider,
                spin,
                pool,
                source,
            } => {
                output.push_str(&Self::format_decider(decider, spin, pool.len(), *source));
            }
        }

        output
    }

    /// Tournament log and final standings
    pub fn format_tournament(outcome: &TournamentOutcome) -> String {
        let mut output = String::new();
        let title = |id: &NominationId| -> String {
            outcome
                .standings
                .iter()
                .find(|c| c.nomination_id() == id)
                .map(|c| c.entry.nomination.display_title().to_string())
                .unwrap_or_else(|| id.to_string())
        };

        output.push_str(&Self::section_header("Battle Royale"));
        for step in &outcome.steps {
            match step {
                TournamentStep::Eliminated {
                    nomination_id,
                    rank,
                } => {
                    output.push_str(&format!(
                        "  {} {} {}\n",
                        "x".red(),
                        title(nomination_id),
                        format!("(#{})", rank).dimmed()
                    ));
                }
                TournamentStep::RunoffStarted {
                    runner_up,
                    finalist,
                } => {
                    output.push_str(&format!(
                        "\n  {} {} vs {}\n",
                        "Final:".yellow().bold(),
                        title(runner_up),
                        title(finalist)
                    ));
                }
                // highlights only pace the reveal
                TournamentStep::Highlighted { .. } => {}
                TournamentStep::Crowned { winner, .. } => {
                    output.push_str(&format!(
                        "\n{} {}\n",
                        "Winner:".green().bold(),
                        title(winner).bold()
                    ));
                }
            }
        }

        output.push_str(&Self::section_header("Standings"));
        for (idx, contender) in outcome.standings.iter().enumerate() {
            output.push_str(&format!(
                "{:>3}  {:<width$}  {:>5}  {}\n",
                idx + 1,
                truncate_title(contender.entry.nomination.display_title(), TITLE_WIDTH),
                contender.score,
                format!("({} superlikes)", contender.superlikes).dimmed(),
                width = TITLE_WIDTH
            ));
        }
        output
    }

    pub fn format_roulette(winner: &RankedEntry, spin: &SpinLog, pool_size: usize) -> String {
        let mut output = format!(
            "{} {}\n",
            "The wheel stops on:".green().bold(),
            winner.nomination.display_title().bold()
        );
        if let Some(venue) = winner.nomination.venue_summary() {
            output.push_str(&format!("  {}\n", format!("at {}", venue).dimmed()));
        }
        output.push_str(&format!(
            "{}\n",
            format!(
                "{} ticks over {} nomination(s)",
                spin.ticks.len(),
                pool_size
            )
            .dimmed()
        ));
        output
    }

    pub fn format_decider(
        decider: &Person,
        spin: &SpinLog,
        pool_size: usize,
        source: RosterSource,
    ) -> String {
        let drawn_from = match source {
            RosterSource::Attendees => "attendees",
            RosterSource::GroupMembers => "group members",
        };
        format!(
            "{} {} picks tonight's movie\n{}\n",
            "Decider:".green().bold(),
            decider.label().bold(),
            format!(
                "drawn from {} {} in {} ticks",
                pool_size,
                drawn_from,
                spin.ticks.len()
            )
            .dimmed()
        )
    }

    pub fn format_decision(
        event_id: &EventId,
        decision: Option<&Decision>,
        nominations: &[Nomination],
    ) -> String {
        match decision {
            Some(decision) => {
                let mut output = format!(
                    "{} {} {}\n",
                    format!("{}:", event_id).cyan().bold(),
                    "decided on".green(),
                    Self::title_of(&decision.nomination_id, nominations).bold()
                );
                if let Some(candidate) = &decision.candidate_id {
                    output.push_str(&format!("  {}\n", format!("movie {}", candidate).dimmed()));
                }
                output
            }
            None => format!(
                "{} {}\n",
                format!("{}:", event_id).cyan().bold(),
                "no decision yet".dimmed()
            ),
        }
    }

    pub fn format_vote(output: &CastVoteOutput) -> String {
        match output.mutation {
            VoteMutation::Upsert(reaction) => {
                format!("{} {}\n", "Voted".green().bold(), reaction)
            }
            VoteMutation::Retract => format!("{}\n", "Vote retracted".yellow().bold()),
        }
    }

    fn title_of(id: &NominationId, nominations: &[Nomination]) -> String {
        nominations
            .iter()
            .find(|n| &n.id == id)
            .map(|n| n.display_title().to_string())
            .unwrap_or_else(|| id.to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(64);
        format!("{}\n{:^64}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(64).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn ranking(&self, entries: &[RankedEntry], scoring: ScoringMethod, filtered: bool) -> String {
        Self::format_ranking(entries, scoring, filtered)
    }

    fn selection(&self, run: &SelectionRun, nominations: &[Nomination]) -> String {
        Self::format_selection(run, nominations)
    }

    fn decision(
        &self,
        event_id: &EventId,
        decision: Option<&Decision>,
        nominations: &[Nomination],
    ) -> String {
        Self::format_decision(event_id, decision, nominations)
    }

    fn vote(&self, output: &CastVoteOutput) -> String {
        Self::format_vote(output)
    }
}
