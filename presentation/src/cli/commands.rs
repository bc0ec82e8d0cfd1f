//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use marquee_domain::{MovieId, OutputFormat, Reaction, ScoringMethod};
use std::path::PathBuf;

/// CLI arguments for marquee
#[derive(Parser, Debug)]
#[command(name = "marquee")]
#[command(author, version, about = "Movie night selection engine")]
#[command(long_about = r#"
Marquee turns an event's nominations and votes into a ranked leaderboard and
picks one winner: a ranked reveal, a battle royale tournament, a movie
roulette, or a decider roulette that hands the choice to one attendee.

Events are read from a JSON snapshot file (--snapshot or [store] snapshot).

Configuration files are loaded from (in priority order):
1. MARQUEE_* environment variables (e.g. MARQUEE_SELECTION__METHOD=battle)
2. --config <path>                 Explicit config file
3. ./marquee.toml                  Project-level config
4. ~/.config/marquee/config.toml   Global config

Example:
  marquee --snapshot friday.json rank friday --by loved
  marquee --snapshot friday.json battle friday --seed 42 --finalize
  marquee --snapshot friday.json vote friday n3 --voter ana superlike
  marquee --snapshot friday.json watch friday
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Event snapshot file (overrides [store] snapshot)
    #[arg(long, global = true, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    /// Output format: text or json (overrides [output] format)
    #[arg(short, long, global = true, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators and animations
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the ranked leaderboard
    Rank {
        #[command(flatten)]
        event: EventArgs,

        /// Scoring policy: score, loved, approval, net
        #[arg(long, value_name = "POLICY")]
        by: Option<ScoringMethod>,
    },

    /// Run a battle royale elimination tournament
    Battle {
        #[command(flatten)]
        event: EventArgs,

        #[command(flatten)]
        draw: DrawArgs,

        /// Runoff alternations between the two finalists (rounded up to even)
        #[arg(long, value_name = "N")]
        alternations: Option<usize>,
    },

    /// Spin the movie roulette
    Roulette {
        #[command(flatten)]
        event: EventArgs,

        #[command(flatten)]
        draw: DrawArgs,
    },

    /// Draw an attendee who picks the movie
    Decider {
        /// Event id
        event: String,

        /// Seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,

        /// Step through the spin
        #[arg(long)]
        animate: bool,
    },

    /// Record a nomination as the event's pick
    Finalize {
        /// Event id
        event: String,

        /// Nomination id
        nomination: String,

        /// Movie to record instead of the nomination's own
        #[arg(long, value_name = "MOVIE")]
        candidate: Option<MovieId>,
    },

    /// Remove the event's pick
    Clear {
        /// Event id
        event: String,
    },

    /// Show the event's current pick
    Status {
        /// Event id
        event: String,
    },

    /// Toggle a reaction on a nomination
    Vote {
        /// Event id
        event: String,

        /// Nomination id
        nomination: String,

        /// dislike, like or superlike; casting the same reaction again retracts it
        reaction: Reaction,

        /// Voting user id
        #[arg(long, value_name = "USER")]
        voter: String,
    },

    /// Follow the leaderboard as votes change
    Watch {
        #[command(flatten)]
        event: EventArgs,

        /// Scoring policy: score, loved, approval, net
        #[arg(long, value_name = "POLICY")]
        by: Option<ScoringMethod>,
    },

    /// Show configuration file locations and the effective configuration
    Config,
}

/// Event selection shared by ranking commands
#[derive(Args, Debug, Clone)]
pub struct EventArgs {
    /// Event id
    pub event: String,

    /// Drop nominations with any dislike (pass `false` to keep them)
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub filter_dislikes: Option<bool>,
}

/// Options for random procedures
#[derive(Args, Debug, Clone)]
pub struct DrawArgs {
    /// Seed for a reproducible draw
    #[arg(long)]
    pub seed: Option<u64>,

    /// Step through the draw
    #[arg(long)]
    pub animate: bool,

    /// Write the winner as the event's decision
    #[arg(long)]
    pub finalize: bool,
}

impl Command {
    /// Event the command operates on, if any
    pub fn event_id(&self) -> Option<&str> {
        match self {
            Command::Rank { event, .. }
            | Command::Battle { event, .. }
            | Command::Roulette { event, .. }
            | Command::Watch { event, .. } => Some(&event.event),
            Command::Decider { event, .. }
            | Command::Finalize { event, .. }
            | Command::Clear { event }
            | Command::Status { event }
            | Command::Vote { event, .. } => Some(event),
            Command::Config => None,
        }
    }
}
