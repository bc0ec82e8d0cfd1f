//! Presentation layer for marquee
//!
//! This crate contains CLI definitions, output formatters,
//! the live leaderboard reporter, and draw replays.

pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, DrawArgs, EventArgs};
pub use config::OutputConfig;
pub use output::console::ConsoleFormatter;
pub use output::formatter::{OutputFormatter, formatter_for};
pub use output::json::JsonFormatter;
pub use progress::replay::{ReplayPace, replay_spin, replay_tournament};
pub use progress::reporter::LeaderboardReporter;
