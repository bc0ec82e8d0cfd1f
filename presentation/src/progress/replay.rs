//! Step-by-step replays of a finished draw
//!
//! The outcome is already decided when a replay starts; replays only pace
//! the recorded log for the terminal.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use marquee_domain::{SpinLog, TournamentOutcome, TournamentStep};
use std::time::Duration;

/// Delays used while replaying
#[derive(Debug, Clone, Copy)]
pub struct ReplayPace {
    pub elimination: Duration,
    pub highlight: Duration,
    /// First spin tick; later ticks slow down toward `slowest_tick`
    pub fastest_tick: Duration,
    pub slowest_tick: Duration,
}

impl Default for ReplayPace {
    fn default() -> Self {
        Self {
            elimination: Duration::from_millis(600),
            highlight: Duration::from_millis(180),
            fastest_tick: Duration::from_millis(40),
            slowest_tick: Duration::from_millis(350),
        }
    }
}

impl ReplayPace {
    /// No delays at all
    pub fn instant() -> Self {
        Self {
            elimination: Duration::ZERO,
            highlight: Duration::ZERO,
            fastest_tick: Duration::ZERO,
            slowest_tick: Duration::ZERO,
        }
    }

    /// Delay before `tick` of `total`, easing out over the last full cycle
    pub fn tick_delay(&self, tick: usize, total: usize, pool_size: usize) -> Duration {
        let slow_from = total.saturating_sub(pool_size.max(1));
        if tick < slow_from || total <= slow_from {
            return self.fastest_tick;
        }
        let progress = (tick - slow_from) as f64 / (total - slow_from) as f64;
        let span = self.slowest_tick.saturating_sub(self.fastest_tick);
        self.fastest_tick + span.mul_f64(progress)
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-")
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {prefix:.bold} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Replay a tournament log on a progress bar
pub async fn replay_tournament(outcome: &TournamentOutcome, pace: ReplayPace) {
    let title = |id: &marquee_domain::NominationId| -> String {
        outcome
            .standings
            .iter()
            .find(|c| c.nomination_id() == id)
            .map(|c| c.entry.nomination.display_title().to_string())
            .unwrap_or_else(|| id.to_string())
    };

    let pb = ProgressBar::new(outcome.steps.len() as u64);
    pb.set_style(bar_style());
    pb.set_prefix("Battle Royale");

    for step in &outcome.steps {
        let delay = match step {
            TournamentStep::Eliminated { nomination_id, .. } => {
                pb.println(format!("  {} {}", "x".red(), title(nomination_id)));
                pb.set_message(format!("{} out", title(nomination_id)));
                pace.elimination
            }
            TournamentStep::RunoffStarted {
                runner_up,
                finalist,
            } => {
                pb.set_prefix("Final");
                pb.set_message(format!("{} vs {}", title(runner_up), title(finalist)));
                pace.elimination
            }
            TournamentStep::Highlighted { nomination_id, .. } => {
                pb.set_message(title(nomination_id).bold().to_string());
                pace.highlight
            }
            TournamentStep::Crowned { winner, .. } => {
                pb.set_message(format!("{} wins!", title(winner)));
                Duration::ZERO
            }
        };
        pb.inc(1);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
    pb.finish_with_message(format!("{}", "Tournament complete!".green()));
}

/// Replay a roulette spin, easing into the winner
pub async fn replay_spin(spin: &SpinLog, labels: &[String], pace: ReplayPace) {
    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style());
    pb.set_prefix("Spinning");

    let total = spin.ticks.len();
    for (tick, &idx) in spin.ticks.iter().enumerate() {
        let label = labels.get(idx).map(String::as_str).unwrap_or("?");
        pb.set_message(label.to_string());
        pb.tick();
        let delay = pace.tick_delay(tick, total, labels.len());
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    let winner = labels
        .get(spin.winner_index)
        .map(String::as_str)
        .unwrap_or("?");
    pb.finish_with_message(format!("{}", winner.green().bold()));
}
