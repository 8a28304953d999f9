//! CLI for the backport bot.
//!
//! Scans the closed pull requests of a repository and opens backport pull
//! requests for every `backport/<version>` label found next to the sentinel.

use backport_bot::{PairOutcome, RunSummary, Runner, RunnerConfig, RunnerError};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Backport Bot - Replay labelled pull requests onto maintenance branches.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Repository to scan, as "owner/name".
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: String,

    /// GitHub token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// Path to backport.toml. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Preview backports without creating branches or pull requests.
    #[arg(long)]
    dry_run: bool,

    /// Maximum number of backports processed at once.
    #[arg(long, default_value_t = 1)]
    concurrency: usize,

    /// Stop after scanning this many closed pull requests.
    #[arg(long)]
    max_pulls: Option<usize>,

    /// GitHub API root, for GitHub Enterprise.
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    // octocrab's TLS stack needs a process-wide crypto provider
    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        warn!("A rustls crypto provider was already installed");
    }

    let args = Args::parse();

    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);
            // Skipped pairs and failed assignments do not fail the run
            if summary.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Installs the global tracing subscriber.
///
/// The library reports progress through `tracing` events and spans: one
/// span per (pull request, version) pair, with nested spans for resolving,
/// replaying and publishing. The subscriber set up here decides which of
/// those events are printed and how.
///
/// - One compact line per event, span fields included
/// - Level filtering through `RUST_LOG` (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        // Module paths add noise; the span fields already say where we are
        .with(fmt::layer().compact().with_target(false))
        // e.g. RUST_LOG=debug shows every API call; falls back to "info"
        // when unset or unparsable
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Builds the runner from the parsed arguments and executes one run.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let mut config = RunnerConfig::new(args.repository, args.token, args.dry_run, args.concurrency);
    if let Some(path) = args.config {
        config = config.with_config_path(path);
    }
    if let Some(api_url) = args.api_url {
        config = config.with_api_url(api_url);
    }
    if let Some(max_pulls) = args.max_pulls {
        config = config.with_max_pulls(max_pulls);
    }
    Runner::new(config)?.run().await
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!("  Pull requests scanned: {}", summary.pulls_scanned);
    println!("  Backports requested: {}", summary.pairs_selected);

    if summary.dry_run {
        println!("  Backports planned: {}", summary.pairs_planned);
    } else {
        println!("  Backports opened: {}", summary.backports_created);
        println!("  Opened as draft: {}", summary.drafts_opened);
        println!("  Assignments failed: {}", summary.assignment_failures);
    }
    println!("  Skipped: {}", summary.pairs_skipped);
    println!("  Failed: {}", summary.pairs_failed);

    // Planned pairs were already previewed while the run progressed
    for outcome in &summary.outcomes {
        match outcome {
            PairOutcome::Created { backport } => println!(
                "  #{} -> {}: {}{}",
                backport.original,
                backport.version,
                backport.url,
                if backport.draft { " (draft)" } else { "" }
            ),
            PairOutcome::Failed {
                pull,
                version,
                stage,
                error,
            } => println!("  #{pull} -> {version}: failed during {stage}: {error}"),
            PairOutcome::Skipped {
                pull,
                version,
                reason,
            } => println!("  #{pull} -> {version}: skipped ({reason})"),
            PairOutcome::Planned { .. } => {}
        }
    }
}
