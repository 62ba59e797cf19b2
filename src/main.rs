//! lex-mirror main entry point
//!
//! This is the command-line interface for mirroring state legal codes and
//! regulations to disk.

use anyhow::{bail, Context};
use clap::Parser;
use lex_mirror::config::{load_config_with_hash, validate, Config};
use lex_mirror::crawler::{Coordinator, RunStatus};
use lex_mirror::output::print_summary;
use lex_mirror::targets::{build_targets, CrawlTarget, Mode, Selection, JURISDICTIONS};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code for usage and configuration errors
const EXIT_USAGE: u8 = 2;

/// lex-mirror: a resumable mirror of state legal codes and regulations
///
/// Walks the Justia listing for each selected state, downloads every section
/// with a bounded pool of workers and stores it as plain text under the
/// output directory. Documents already on disk are skipped, so an interrupted
/// run can simply be started again.
#[derive(Parser, Debug)]
#[command(name = "lex-mirror")]
#[command(version)]
#[command(about = "Mirror state legal codes and regulations to disk", long_about = None)]
struct Cli {
    /// Two-letter jurisdiction codes to mirror (e.g. TX CA)
    #[arg(
        value_name = "STATE",
        conflicts_with_all = ["range", "all"],
        required_unless_present_any = ["range", "all"]
    )]
    states: Vec<String>,

    /// Mirror every jurisdiction from FROM to TO, inclusive, in alphabetical order of name
    #[arg(long, num_args = 2, value_names = ["FROM", "TO"], conflicts_with = "all")]
    range: Option<Vec<String>>,

    /// Mirror every jurisdiction
    #[arg(long)]
    all: bool,

    /// Mirror administrative regulations instead of statutory codes
    #[arg(short, long)]
    regulations: bool,

    /// Number of download workers (overrides the config file)
    #[arg(short, long, value_name = "N")]
    threads: Option<usize>,

    /// Download documents again even if they are already on disk
    #[arg(long)]
    overwrite: bool,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output directory (overrides the config file)
    #[arg(short = 'O', long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Edition year of the codes to mirror (overrides the config file)
    #[arg(long, value_name = "YEAR")]
    year: Option<u16>,

    /// Do not draw progress bars
    #[arg(long)]
    no_progress: bool,

    /// Show the resolved targets without downloading anything
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn selection(&self) -> Selection {
        if self.all {
            Selection::All
        } else if let Some([from, to]) = self.range.as_deref() {
            Selection::Range {
                from: from.clone(),
                to: to.clone(),
            }
        } else {
            Selection::Explicit(self.states.clone())
        }
    }

    fn mode(&self) -> Mode {
        if self.regulations {
            Mode::Regulations
        } else {
            Mode::Codes
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (config, targets) = match prepare(&cli) {
        Ok(prepared) => prepared,
        Err(e) => {
            tracing::error!("{:#}", e);
            return ExitCode::from(EXIT_USAGE);
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, &targets);
        return ExitCode::SUCCESS;
    }

    match handle_mirror(config, &targets, &cli).await {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(EXIT_USAGE)
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
            0 => EnvFilter::new("lex_mirror=info,warn"),
            1 => EnvFilter::new("lex_mirror=debug,info"),
            2 => EnvFilter::new("lex_mirror=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the configuration, applies command-line overrides and resolves targets
fn prepare(cli: &Cli) -> anyhow::Result<(Config, Vec<CrawlTarget>)> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(threads) = cli.threads {
        config.crawler.workers = threads;
    }
    if let Some(output) = &cli.output {
        config.output.root_dir = output.clone();
    }
    if let Some(year) = cli.year {
        config.site.codes_year = year;
    }
    validate(&config).context("Invalid settings")?;

    let jurisdictions = cli
        .selection()
        .resolve(JURISDICTIONS)
        .context("Invalid target selection")?;
    let targets = build_targets(&jurisdictions, cli.mode(), &config.site)
        .context("Failed to build target URLs")?;
    if targets.is_empty() {
        bail!("No targets selected");
    }

    Ok((config, targets))
}

/// Handles the --dry-run mode: shows what would be mirrored
fn handle_dry_run(config: &Config, targets: &[CrawlTarget]) {
    println!("=== lex-mirror Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Workers: {}", config.crawler.workers);
    println!("  Queue capacity: {}", config.crawler.queue_capacity());
    println!("  Max attempts: {}", config.crawler.max_attempts);
    println!(
        "  Backoff: {}ms doubling up to {}ms",
        config.crawler.backoff_base_ms, config.crawler.backoff_max_ms
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Root: {}", config.output.root_dir.display());
    println!("  Failures log: {}", config.output.failures_log_path().display());

    println!("\nTargets ({}):", targets.len());
    for target in targets {
        println!("  - {} ({}) {}", target.label(), target.jurisdiction.name, target.root_url);
    }
}

/// Handles the main mirror operation
async fn handle_mirror(
    config: Config,
    targets: &[CrawlTarget],
    cli: &Cli,
) -> anyhow::Result<RunStatus> {
    if cli.overwrite {
        tracing::info!("Overwrite requested, documents on disk will be fetched again");
    }

    let coordinator = Coordinator::new(config)
        .context("Failed to build HTTP client")?
        .overwrite(cli.overwrite)
        .show_progress(!cli.no_progress && !cli.quiet);

    let cancel = coordinator.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        tracing::warn!("Interrupt received, stopping after in-flight writes (Ctrl-C again to abort)");
        cancel.cancel();
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(i32::from(RunStatus::Interrupted.exit_code()));
        }
    });

    let report = coordinator.run(targets).await;
    if !cli.quiet {
        print_summary(&report);
    }

    let status = report.status();
    match status {
        RunStatus::Success => tracing::info!("Mirror completed successfully"),
        RunStatus::Failed => tracing::warn!(
            "Mirror completed with failures, see {}",
            coordinator.config().output.failures_log_path().display()
        ),
        RunStatus::Interrupted => tracing::warn!("Mirror interrupted, run again to resume"),
    }
    Ok(status)
}
