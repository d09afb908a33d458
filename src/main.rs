//! Sumi-Linkcheck main entry point
//!
//! This is the command-line interface for the Sumi-Linkcheck link checker.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use sumi_linkcheck::config::{load_config, validate, Config};
use sumi_linkcheck::crawler::{Coordinator, TracingObserver};
use sumi_linkcheck::output::{write_report, ReportFormat, TerminalProgress};
use sumi_linkcheck::url::ScopeMode;
use tracing_subscriber::EnvFilter;

/// Sumi-Linkcheck: a depth-limited broken link checker
///
/// Sumi-Linkcheck crawls a site breadth-first from a seed URL, fetching each
/// in-scope link once, and reports which links work and which are broken.
#[derive(Parser, Debug)]
#[command(name = "sumi-linkcheck")]
#[command(version)]
#[command(about = "A depth-limited broken link checker", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "SEED_URL")]
    seed_url: String,

    /// Path to TOML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Deepest level whose pages get their links extracted (seed = 0)
    #[arg(short = 'd', long, value_name = "N")]
    max_depth: Option<u32>,

    /// Maximum number of simultaneous requests
    #[arg(short = 'c', long, value_name = "N")]
    concurrency: Option<u32>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Extra attempts for network errors and 5xx responses
    #[arg(long, value_name = "N")]
    retries: Option<u32>,

    /// How to decide which links belong to the site
    #[arg(long, value_enum, value_name = "MODE")]
    scope: Option<ScopeMode>,

    /// Domain pattern to treat as in scope (implies --scope patterns)
    #[arg(long = "allow", value_name = "PATTERN")]
    allow: Vec<String>,

    /// Report format
    #[arg(short = 'f', long, value_enum)]
    format: Option<ReportFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short = 'o', long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Do not print per-round progress to stderr
    #[arg(long)]
    no_progress: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(true) => ExitCode::from(1),
        Ok(false) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_linkcheck=info,warn"),
            1 => EnvFilter::new("sumi_linkcheck=debug,info"),
            2 => EnvFilter::new("sumi_linkcheck=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Runs the crawl and writes the report
///
/// Returns whether any broken links were found.
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load {}", path.display()))?
        }
        None => Config::default(),
    };
    apply_overrides(&mut config, &cli);
    validate(&config).context("invalid settings")?;

    let coordinator = Coordinator::new(&config)?;
    let coordinator = if cli.no_progress || cli.quiet {
        coordinator.with_observer(TracingObserver)
    } else {
        coordinator.with_observer(TerminalProgress)
    };
    let cancel = coordinator.cancel_flag();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current round");
            cancel.cancel();
        }
    });

    let result = coordinator.crawl(&cli.seed_url).await?;

    let output_path = cli
        .output
        .clone()
        .or_else(|| config.output.path.as_ref().map(PathBuf::from));
    write_report(&result, config.output.format, output_path.as_deref())?;

    Ok(result.has_errors())
}

/// Applies command-line flags on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(depth) = cli.max_depth {
        config.crawler.max_depth = depth;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrency = concurrency;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.request_timeout = timeout;
    }
    if let Some(retries) = cli.retries {
        config.retry.max_attempts = retries.saturating_add(1);
    }
    if !cli.allow.is_empty() {
        config.scope.patterns = cli.allow.clone();
        config.scope.mode = ScopeMode::Patterns;
    }
    if let Some(mode) = cli.scope {
        config.scope.mode = mode;
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
}
