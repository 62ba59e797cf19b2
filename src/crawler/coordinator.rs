//! Run coordinator
//!
//! The coordinator processes targets one after another. For each target it
//! starts a worker pool on a fresh bounded queue, runs the walker until the
//! hierarchy is exhausted, then waits for the pool to drain. Leaves that the
//! workers found to be listings are walked again as branches in a follow-up
//! round. A failing target never stops the ones after it; only cancellation
//! does.

use crate::config::Config;
use crate::crawler::fetcher::{Fetcher, HttpTransport, RetryPolicy, Transport};
use crate::crawler::parser::{parser_for, PageParser};
use crate::crawler::scheduler::{PoolStats, WorkerContext, WorkerPool};
use crate::crawler::walker::{TreeWalker, WalkStats};
use crate::output::{ProgressReporter, ProgressSnapshot, TargetProgress};
use crate::state::{FailureKind, Node};
use crate::storage::{FsResumeStore, NoResume, ResumeStore};
use crate::targets::{CrawlTarget, Mode};
use crate::HarvestError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Bound on walk rounds per target; each round expands the listings the
/// previous one mistook for documents
const MAX_WALK_ROUNDS: usize = 8;

/// Overall outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every target finished with no failed documents or listings
    Success,

    /// Every target ran, at least one thing failed
    Failed,

    /// Cancelled before all targets finished
    Interrupted,
}

impl RunStatus {
    /// Process exit code for this status
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failed => 1,
            Self::Interrupted => 130,
        }
    }
}

/// Everything known about a finished run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// One snapshot per started target, in run order
    pub targets: Vec<ProgressSnapshot>,
    /// Number of targets the run was asked to process
    pub requested: usize,
    pub interrupted: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn status(&self) -> RunStatus {
        if self.interrupted {
            RunStatus::Interrupted
        } else if self.targets.len() == self.requested
            && self.targets.iter().all(ProgressSnapshot::is_clean)
        {
            RunStatus::Success
        } else {
            RunStatus::Failed
        }
    }

    /// Sum of all target counters
    pub fn totals(&self) -> ProgressSnapshot {
        self.targets
            .iter()
            .fold(ProgressSnapshot::new("all"), |mut acc, s| {
                acc.total_discovered += s.total_discovered;
                acc.completed += s.completed;
                acc.failed += s.failed;
                acc.skipped_resumed += s.skipped_resumed;
                acc.index_failures += s.index_failures;
                acc
            })
    }
}

/// Drives walker and worker pool for each target
pub struct Coordinator {
    config: Arc<Config>,
    fetcher: Arc<Fetcher>,
    codes_parser: Arc<dyn PageParser>,
    regulations_parser: Arc<dyn PageParser>,
    resume: Arc<dyn ResumeStore>,
    cancel: CancellationToken,
    show_progress: bool,
}

impl Coordinator {
    /// Creates a coordinator that talks HTTP with the configured user agent
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let transport = HttpTransport::from_config(&config.user_agent, &config.crawler)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a coordinator over an arbitrary transport
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        let policy = RetryPolicy::from_config(&config.crawler);
        Self {
            fetcher: Arc::new(Fetcher::new(transport, policy)),
            codes_parser: parser_for(Mode::Codes),
            regulations_parser: parser_for(Mode::Regulations),
            resume: Arc::new(FsResumeStore),
            cancel: CancellationToken::new(),
            show_progress: false,
            config: Arc::new(config),
        }
    }

    /// Replaces the parser used for `mode`
    pub fn with_parser(mut self, mode: Mode, parser: Arc<dyn PageParser>) -> Self {
        match mode {
            Mode::Codes => self.codes_parser = parser,
            Mode::Regulations => self.regulations_parser = parser,
        }
        self
    }

    pub fn with_resume_store(mut self, resume: Arc<dyn ResumeStore>) -> Self {
        self.resume = resume;
        self
    }

    /// Re-fetch every leaf, replacing files already on disk
    pub fn overwrite(self, overwrite: bool) -> Self {
        if overwrite {
            self.with_resume_store(Arc::new(NoResume))
        } else {
            self
        }
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Token that stops the run when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn parser(&self, mode: Mode) -> Arc<dyn PageParser> {
        match mode {
            Mode::Codes => Arc::clone(&self.codes_parser),
            Mode::Regulations => Arc::clone(&self.regulations_parser),
        }
    }

    /// Processes `targets` in order and reports what happened
    ///
    /// Cancellation stops the current target promptly and leaves the
    /// remaining ones unstarted. Everything already written stays valid.
    pub async fn run(&self, targets: &[CrawlTarget]) -> RunReport {
        let started_at = Utc::now();
        let labels: Vec<String> = targets.iter().map(CrawlTarget::label).collect();
        let (handle, reporter) = ProgressReporter::spawn(
            labels,
            self.show_progress,
            Some(self.config.output.failures_log_path()),
        );

        tracing::info!(
            "Mirroring {} targets into {} with {} workers, up to {} attempts per page",
            targets.len(),
            self.config.output.root_dir.display(),
            self.config.crawler.workers,
            self.fetcher.policy().max_attempts()
        );

        let mut started = 0;
        let mut interrupted = false;
        for (index, target) in targets.iter().enumerate() {
            if self.cancel.is_cancelled() {
                interrupted = true;
                tracing::info!(
                    "Interrupted, {} targets not started",
                    targets.len() - index
                );
                break;
            }

            started += 1;
            let progress = handle.target(index);
            progress.started();
            let finished = self.run_target(target, progress.clone()).await;
            progress.finished();

            if !finished {
                interrupted = true;
            }
        }
        drop(handle);

        let mut snapshots = match reporter.await {
            Ok(snapshots) => snapshots,
            Err(e) => {
                tracing::error!("Progress reporter failed: {}", e);
                Vec::new()
            }
        };
        snapshots.truncate(started);

        let report = RunReport {
            targets: snapshots,
            requested: targets.len(),
            interrupted,
            started_at,
            finished_at: Utc::now(),
        };
        tracing::info!("Run finished with status {:?}", report.status());
        report
    }

    /// Runs one target to completion; false if it was cut short by cancellation
    async fn run_target(&self, target: &CrawlTarget, progress: TargetProgress) -> bool {
        let parser = self.parser(target.mode);
        let walker = TreeWalker::new(
            Arc::clone(&self.fetcher),
            Arc::clone(&parser),
            Arc::clone(&self.resume),
            self.config.output.root_dir.clone(),
            self.cancel.clone(),
        );

        let mut pool_totals = PoolStats::default();
        let mut resumed = 0;
        let mut index_failures = 0;
        let mut roots = Vec::new();
        let mut finished = true;

        for round in 1..=MAX_WALK_ROUNDS {
            let (walk, pool_stats, relisted) =
                self.walk_round(target, &walker, &parser, &progress, round, roots).await;
            pool_totals.merge(pool_stats);
            resumed += walk.resumed;
            index_failures += walk.index_failures;

            if walk.cancelled || self.cancel.is_cancelled() {
                finished = false;
                break;
            }
            if relisted.is_empty() {
                break;
            }
            if round == MAX_WALK_ROUNDS {
                for node in &relisted {
                    tracing::warn!("Giving up on {}: listing and document pages keep alternating", node.url);
                    progress.index_failed(node.url.as_str(), FailureKind::ParseFailed);
                }
                index_failures += relisted.len() as u64;
                break;
            }
            tracing::info!(
                "{}: expanding {} pages that turned out to be listings",
                target.label(),
                relisted.len()
            );
            roots = relisted;
        }

        tracing::info!(
            "{}: {} saved, {} failed, {} already on disk, {} index failures",
            target.label(),
            pool_totals.completed,
            pool_totals.failed,
            resumed,
            index_failures
        );
        if pool_totals.abandoned > 0 {
            tracing::info!(
                "{}: {} in-flight documents abandoned",
                target.label(),
                pool_totals.abandoned
            );
        }

        finished
    }

    /// One walk over a fresh queue and pool
    ///
    /// Round 1 starts at the target root, later rounds at `roots`. Returns the
    /// nodes the workers handed back as listings.
    async fn walk_round(
        &self,
        target: &CrawlTarget,
        walker: &TreeWalker,
        parser: &Arc<dyn PageParser>,
        progress: &TargetProgress,
        round: usize,
        roots: Vec<Node>,
    ) -> (WalkStats, PoolStats, Vec<Node>) {
        let crawler = &self.config.crawler;
        let (tx, rx) = mpsc::channel(crawler.queue_capacity());
        let (relist_tx, mut relist_rx) = mpsc::unbounded_channel();

        let pool = WorkerPool::spawn(
            crawler.workers,
            rx,
            WorkerContext {
                fetcher: Arc::clone(&self.fetcher),
                parser: Arc::clone(parser),
                progress: progress.clone(),
                cancel: self.cancel.clone(),
                relist: relist_tx,
            },
        );

        let walk = if round == 1 {
            walker.walk(target, tx, progress).await
        } else {
            walker.walk_from(target, roots, tx, progress).await
        };
        let pool_stats = pool.join().await;

        // Every worker has exited, so every sender is gone.
        let mut relisted = Vec::new();
        while let Some(node) = relist_rx.recv().await {
            relisted.push(node);
        }
        (walk, pool_stats, relisted)
    }
}
