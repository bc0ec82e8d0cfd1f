//! CLI entrypoint for marquee
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use marquee_application::{
    CastVoteInput, CastVoteUseCase, ComputeRankingInput, ComputeRankingUseCase,
    FinalizeDecisionUseCase, LiveRankingSync, NoSelectionLogger, RankingView, RunSelectionInput,
    RunSelectionUseCase, SelectionConfig, SelectionLogger, SelectionOutcome, SelectionRun,
    SelectionStore,
};
use marquee_domain::{ConfigIssue, EventId, NominationId, SelectionMethod, Severity};
use marquee_infrastructure::{ConfigLoader, FileConfig, JsonSnapshotStore, JsonlSelectionLogger};
use marquee_presentation::{
    Cli, Command, DrawArgs, EventArgs, LeaderboardReporter, OutputConfig, OutputFormatter,
    ReplayPace, formatter_for, replay_spin, replay_tournament,
};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting marquee");

    // === Configuration ===
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let issues = file_config.validate();
    report_issues(&issues);
    if ConfigIssue::has_errors(&issues) {
        bail!("Configuration has errors");
    }

    if let Command::Config = cli.command {
        if !cli.no_config {
            ConfigLoader::print_config_sources(cli.config.as_ref());
            println!();
        }
        println!("Effective configuration:\n");
        println!("{}", toml::to_string_pretty(&file_config)?);
        return Ok(());
    }

    let (selection, _) = file_config.selection.to_selection_config();
    let output = OutputConfig::resolve(
        cli.output,
        file_config.output.format,
        file_config.output.color,
        cli.no_color,
        cli.quiet,
    );
    output.apply();

    // === Dependency Injection ===
    let snapshot = cli
        .snapshot
        .clone()
        .or_else(|| file_config.store.snapshot.clone())
        .context("No event snapshot given; pass --snapshot or set [store] snapshot")?;
    let store = Arc::new(
        JsonSnapshotStore::new(snapshot).with_poll_interval(file_config.store.poll_interval()),
    );
    let audit_log = audit_logger(&file_config);

    let app = App {
        store,
        audit_log,
        selection,
        output,
        formatter: formatter_for(output.format),
    };
    app.dispatch(cli.command).await
}

fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .context("--log-file must name a file")?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Could not create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            builder.with_writer(writer).with_ansi(false).init();
            Ok(Some(guard))
        }
        None => {
            builder.with_writer(std::io::stderr).init();
            Ok(None)
        }
    }
}

fn report_issues(issues: &[ConfigIssue]) {
    for issue in issues {
        let label = match issue.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        eprintln!("config {}: {}", label, issue.message);
    }
}

fn audit_logger(config: &FileConfig) -> Arc<dyn SelectionLogger> {
    match &config.logging.audit_log {
        Some(path) => match JsonlSelectionLogger::new(path) {
            Some(logger) => {
                info!("Selection audit log: {}", logger.path().display());
                Arc::new(logger)
            }
            None => Arc::new(NoSelectionLogger),
        },
        None => Arc::new(NoSelectionLogger),
    }
}

/// Wired-up layers for one command
struct App {
    store: Arc<JsonSnapshotStore>,
    audit_log: Arc<dyn SelectionLogger>,
    selection: SelectionConfig,
    output: OutputConfig,
    formatter: Box<dyn OutputFormatter>,
}

impl App {
    async fn dispatch(&self, command: Command) -> Result<()> {
        match command {
            Command::Rank { event, by } => self.rank(&event, by).await,
            Command::Battle {
                event,
                draw,
                alternations,
            } => {
                let mut input = self.draw_input(&event.event, SelectionMethod::BattleRoyale, &draw);
                input.filter_dislikes = self.filter(&event);
                if let Some(n) = alternations {
                    input.runoff_alternations = n;
                }
                self.draw(input, &draw).await
            }
            Command::Roulette { event, draw } => {
                let mut input = self.draw_input(&event.event, SelectionMethod::MovieRoulette, &draw);
                input.filter_dislikes = self.filter(&event);
                self.draw(input, &draw).await
            }
            Command::Decider {
                event,
                seed,
                animate,
            } => {
                let draw = DrawArgs {
                    seed,
                    animate,
                    finalize: false,
                };
                let input = self.draw_input(&event, SelectionMethod::DeciderRoulette, &draw);
                self.draw(input, &draw).await
            }
            Command::Finalize {
                event,
                nomination,
                candidate,
            } => {
                self.finalize(&EventId::new(event), &NominationId::new(nomination), candidate)
                    .await
            }
            Command::Clear { event } => {
                let event_id = EventId::new(event);
                self.finalizer().clear(&event_id).await?;
                self.print_decision(&event_id).await
            }
            Command::Status { event } => self.print_decision(&EventId::new(event)).await,
            Command::Vote {
                event,
                nomination,
                reaction,
                voter,
            } => {
                let out = CastVoteUseCase::new(self.store.clone())
                    .execute(CastVoteInput::new(event, nomination, voter, reaction))
                    .await?;
                print!("{}", self.formatter.vote(&out));
                Ok(())
            }
            Command::Watch { event, by } => self.watch(&event, by).await,
            Command::Config => Ok(()),
        }
    }

    fn filter(&self, event: &EventArgs) -> bool {
        event
            .filter_dislikes
            .unwrap_or(self.selection.filter_dislikes)
    }

    fn draw_input(&self, event: &str, method: SelectionMethod, draw: &DrawArgs) -> RunSelectionInput {
        let input = RunSelectionInput::new(event, &self.selection).with_method(method);
        match draw.seed {
            Some(seed) => input.with_seed(seed),
            None => input,
        }
    }

    fn finalizer(&self) -> FinalizeDecisionUseCase<JsonSnapshotStore> {
        FinalizeDecisionUseCase::new(self.store.clone()).with_selection_logger(self.audit_log.clone())
    }

    async fn rank(&self, event: &EventArgs, by: Option<marquee_domain::ScoringMethod>) -> Result<()> {
        let scoring = by.unwrap_or(self.selection.scoring());
        let filter = self.filter(event);
        let input = ComputeRankingInput::new(event.event.as_str(), scoring).with_filter_dislikes(filter);

        let entries = ComputeRankingUseCase::new(self.store.clone())
            .with_selection_logger(self.audit_log.clone())
            .execute(&input)
            .await?;
        print!("{}", self.formatter.ranking(&entries, scoring, filter));
        Ok(())
    }

    async fn draw(&self, input: RunSelectionInput, draw: &DrawArgs) -> Result<()> {
        let event_id = input.event_id.clone();
        let run = RunSelectionUseCase::new(self.store.clone())
            .with_selection_logger(self.audit_log.clone())
            .execute(input)
            .await?;

        if draw.animate && self.output.show_progress {
            replay(&run).await;
        }

        let nominations = self.store.list_nominations(&event_id).await?;
        print!("{}", self.formatter.selection(&run, &nominations));

        if draw.finalize {
            let winner = picked_nomination(&run)
                .context("This method does not pick a nomination to finalize")?
                .clone();
            self.finalize(&event_id, &winner, None).await?;
        }
        Ok(())
    }

    async fn finalize(
        &self,
        event_id: &EventId,
        nomination_id: &NominationId,
        candidate: Option<marquee_domain::MovieId>,
    ) -> Result<()> {
        self.finalizer()
            .select(event_id, nomination_id, candidate)
            .await?;
        self.print_decision(event_id).await
    }

    async fn print_decision(&self, event_id: &EventId) -> Result<()> {
        let decision = self.finalizer().current(event_id).await?;
        let nominations = self.store.list_nominations(event_id).await?;
        print!(
            "{}",
            self.formatter
                .decision(event_id, decision.as_ref(), &nominations)
        );
        Ok(())
    }

    async fn watch(&self, event: &EventArgs, by: Option<marquee_domain::ScoringMethod>) -> Result<()> {
        let view = RankingView::new(by.unwrap_or(self.selection.scoring()), self.filter(event));
        let reporter = Arc::new(LeaderboardReporter::new(self.output.format));
        let cancel = CancellationToken::new();

        let handle = LiveRankingSync::new(self.store.clone())
            .with_observer(reporter)
            .start(EventId::new(event.event.as_str()), view, cancel.clone())
            .await?;

        if self.output.show_progress {
            eprintln!("Watching {} (Ctrl-C to stop)", event.event);
        }
        tokio::signal::ctrl_c()
            .await
            .context("Could not listen for Ctrl-C")?;
        handle.stop().await;
        Ok(())
    }
}

/// The nomination a draw settled on, if it picks one
fn picked_nomination(run: &SelectionRun) -> Option<&NominationId> {
    match &run.outcome {
        SelectionOutcome::Tournament(outcome) => Some(&outcome.winner.nomination.id),
        SelectionOutcome::Roulette { winner, .. } => Some(&winner.nomination.id),
        SelectionOutcome::Ranked { .. } | SelectionOutcome::Decider { .. } => None,
    }
}

async fn replay(run: &SelectionRun) {
    let pace = ReplayPace::default();
    match &run.outcome {
        SelectionOutcome::Tournament(outcome) => replay_tournament(outcome, pace).await,
        SelectionOutcome::Roulette { spin, pool, .. } => {
            let labels: Vec<String> = pool
                .iter()
                .map(|e| e.nomination.display_title().to_string())
                .collect();
            replay_spin(spin, &labels, pace).await;
        }
        SelectionOutcome::Decider { spin, pool, .. } => {
            let labels: Vec<String> = pool.iter().map(|p| p.label().to_string()).collect();
            replay_spin(spin, &labels, pace).await;
        }
        SelectionOutcome::Ranked { .. } => {}
    }
}
