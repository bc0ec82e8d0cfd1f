//! Live leaderboard reporting for `watch`

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use marquee_application::ports::ranking_observer::{RankingObserver, RankingSnapshot};
use marquee_domain::{NominationId, OutputFormat};
use std::sync::Mutex;

/// Prints every published ranking and calls out lead changes
pub struct LeaderboardReporter {
    format: OutputFormat,
    leader: Mutex<Option<NominationId>>,
}

impl LeaderboardReporter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            leader: Mutex::new(None),
        }
    }

    /// Render one snapshot: a table in text mode, a single line in JSON mode
    pub fn render(&self, snapshot: &RankingSnapshot) -> String {
        let new_leader = snapshot.entries.first().map(|e| e.nomination.id.clone());
        let changed = {
            let mut leader = self.leader.lock().unwrap_or_else(|e| e.into_inner());
            let changed = *leader != new_leader && leader.is_some();
            *leader = new_leader;
            changed
        };

        match self.format {
            OutputFormat::Json => {
                serde_json::to_string(snapshot).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Text => {
                let mut output = format!(
                    "\n{}\n",
                    format!("update #{} for {}", snapshot.generation, snapshot.event_id).dimmed()
                );
                output.push_str(&ConsoleFormatter::format_ranking(
                    &snapshot.entries,
                    snapshot.scoring,
                    snapshot.filter_dislikes,
                ));
                if changed && let Some(top) = snapshot.entries.first() {
                    output.push_str(&format!(
                        "{} {}\n",
                        "New leader:".yellow().bold(),
                        top.nomination.display_title()
                    ));
                }
                output
            }
        }
    }
}

impl RankingObserver for LeaderboardReporter {
    fn on_ranking(&self, snapshot: &RankingSnapshot) {
        println!("{}", self.render(snapshot));
    }

    fn on_refresh_failed(&self, error: &str) {
        eprintln!(
            "{} {} {}",
            "!".red().bold(),
            "Refresh failed, showing last ranking:".red(),
            error
        );
    }
}
