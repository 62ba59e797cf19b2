//! Worker pool that drains the job queue
//!
//! This module handles:
//! - Spawning a fixed number of workers over one shared receiver
//! - Running each job: fetch, extract text, write atomically
//! - Reporting every outcome to the progress reporter
//! - Handing back leaves whose page turned out to be a listing, so the
//!   coordinator can walk them as branches
//!
//! Concurrency is bounded by construction: there are exactly `workers` tasks
//! and each runs one job at a time.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{PageParser, ParseError};
use crate::output::TargetProgress;
use crate::state::{FailureKind, Job, JobOutcome, Node};
use crate::storage::write_atomic;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Everything a worker needs besides the queue
#[derive(Clone)]
pub struct WorkerContext {
    pub fetcher: Arc<Fetcher>,
    pub parser: Arc<dyn PageParser>,
    pub progress: TargetProgress,
    pub cancel: CancellationToken,
    /// Misclassified leaves, re-kinded as branches
    pub relist: mpsc::UnboundedSender<Node>,
}

/// Per-worker tallies, summed by `WorkerPool::join`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub completed: u64,
    pub failed: u64,
    pub abandoned: u64,
    pub relisted: u64,
}

impl PoolStats {
    pub fn merge(&mut self, other: PoolStats) {
        self.completed += other.completed;
        self.failed += other.failed;
        self.abandoned += other.abandoned;
        self.relisted += other.relisted;
    }
}

/// What running a job came to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobResult {
    Finished(JobOutcome),
    /// The page is a listing; nothing was written
    Listing,
}

/// A running set of workers
pub struct WorkerPool {
    handles: Vec<JoinHandle<PoolStats>>,
}

impl WorkerPool {
    /// Starts `workers` tasks sharing `jobs`
    ///
    /// Workers stop when the queue is closed and drained, or when the
    /// context's cancellation token fires.
    pub fn spawn(workers: usize, jobs: mpsc::Receiver<Job>, context: WorkerContext) -> Self {
        let jobs = Arc::new(Mutex::new(jobs));
        let handles = (0..workers.max(1))
            .map(|id| tokio::spawn(worker_loop(id, Arc::clone(&jobs), context.clone())))
            .collect();
        Self { handles }
    }

    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Waits for every worker to exit
    pub async fn join(self) -> PoolStats {
        let mut stats = PoolStats::default();
        for result in futures::future::join_all(self.handles).await {
            match result {
                Ok(worker_stats) => stats.merge(worker_stats),
                Err(e) => tracing::error!("Worker task failed: {}", e),
            }
        }
        stats
    }
}

async fn worker_loop(
    id: usize,
    jobs: Arc<Mutex<mpsc::Receiver<Job>>>,
    context: WorkerContext,
) -> PoolStats {
    let mut stats = PoolStats::default();
    tracing::trace!("Worker {} started", id);

    loop {
        let next = tokio::select! {
            biased;
            _ = context.cancel.cancelled() => None,
            job = async { jobs.lock().await.recv().await } => job,
        };
        let Some(mut job) = next else {
            break;
        };

        let result = tokio::select! {
            biased;
            _ = context.cancel.cancelled() => {
                tracing::debug!("Worker {} abandoning {}", id, job.url());
                stats.abandoned += 1;
                break;
            }
            result = run_job(&context, &mut job) => result,
        };

        let outcome = match result {
            JobResult::Finished(outcome) => outcome,
            JobResult::Listing => {
                let url = job.url().to_string();
                if context.relist.send(job.node.into_branch()).is_ok() {
                    tracing::debug!("{} is a listing page, handing it back for expansion", url);
                    stats.relisted += 1;
                    context.progress.relisted(&url);
                    continue;
                }
                tracing::warn!("{} is a listing page and nobody can expand it", url);
                stats.failed += 1;
                context
                    .progress
                    .job_finished(&url, JobOutcome::Failed(FailureKind::ParseFailed));
                continue;
            }
        };

        if outcome.is_success() {
            tracing::debug!(
                "Saved {} -> {} ({} attempts)",
                job.url(),
                job.destination.display(),
                job.attempt_count
            );
            stats.completed += 1;
        } else {
            stats.failed += 1;
        }
        context.progress.job_finished(job.url().as_str(), outcome);
    }

    tracing::trace!("Worker {} exiting", id);
    stats
}

/// Fetch, extract, write; never panics, every failure becomes an outcome
async fn run_job(context: &WorkerContext, job: &mut Job) -> JobResult {
    let fetched = match context.fetcher.fetch_url(job.url()).await {
        Ok(fetched) => fetched,
        Err(e) => {
            job.attempt_count = e.attempts();
            tracing::warn!("Failed to fetch {}: {}", job.url(), e);
            return JobResult::Finished(JobOutcome::Failed(e.failure_kind()));
        }
    };
    job.attempt_count = fetched.attempts;

    let text = match context
        .parser
        .extract_document_text(job.url(), &fetched.body)
    {
        Ok(text) => text,
        Err(ParseError::ListingPage { .. }) => return JobResult::Listing,
        Err(e) => {
            tracing::warn!("Failed to extract {}: {}", job.url(), e);
            return JobResult::Finished(JobOutcome::Failed(FailureKind::ParseFailed));
        }
    };

    if let Err(e) = write_atomic(&job.destination, text.as_bytes()).await {
        tracing::warn!("Failed to save {}: {}", job.url(), e);
        return JobResult::Finished(JobOutcome::Failed(FailureKind::IoFailed));
    }

    JobResult::Finished(JobOutcome::Completed {
        attempts: job.attempt_count,
    })
}
