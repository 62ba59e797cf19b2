//! Progress aggregation
//!
//! A single reporter task owns every counter. The walker and the workers hold
//! cheap `TargetProgress` handles and send events over an unbounded channel,
//! so reporting never blocks a worker. When the last handle is dropped the
//! reporter finishes its bars and returns one snapshot per target.

use crate::state::{FailureKind, JobOutcome};
use chrono::{SecondsFormat, Utc};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const TARGET_TEMPLATE: &str = "{prefix:>18} [{bar:30.cyan/blue}] {pos}/{len} {msg}";
const GLOBAL_TEMPLATE: &str = "{spinner} {prefix:>16} [{elapsed_precise}] {pos} done {msg}";

/// Messages accepted by the reporter; `target` indexes the run's target list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    TargetStarted { target: usize },
    Discovered { target: usize },
    Resumed { target: usize },
    /// A leaf turned out to be a listing and was handed back for expansion
    Relisted { target: usize, url: String },
    Completed { target: usize, url: String },
    Failed { target: usize, url: String, kind: FailureKind },
    IndexFailed { target: usize, url: String, kind: FailureKind },
    TargetFinished { target: usize },
}

/// Counters for one target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub target: String,
    /// Leaves found, including those already on disk
    pub total_discovered: u64,
    pub completed: u64,
    pub failed: u64,
    pub skipped_resumed: u64,
    /// Listings whose subtree could not be expanded
    pub index_failures: u64,
}

impl ProgressSnapshot {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    /// Leaves handed to workers
    pub fn dispatched(&self) -> u64 {
        self.total_discovered.saturating_sub(self.skipped_resumed)
    }

    /// Nothing failed, neither a document nor a listing
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.index_failures == 0
    }

    pub fn summary_line(&self) -> String {
        format!(
            "{}: {} discovered, {} completed, {} failed, {} already on disk, {} index failures",
            self.target,
            self.total_discovered,
            self.completed,
            self.failed,
            self.skipped_resumed,
            self.index_failures
        )
    }
}

/// Sender side handed to the coordinator
#[derive(Debug, Clone)]
pub struct ProgressHandle {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ProgressHandle {
    /// Handle bound to the target at `index`
    pub fn target(&self, index: usize) -> TargetProgress {
        TargetProgress {
            tx: self.tx.clone(),
            target: index,
        }
    }
}

/// Fire-and-forget reporting for one target
#[derive(Debug, Clone)]
pub struct TargetProgress {
    tx: mpsc::UnboundedSender<ProgressEvent>,
    target: usize,
}

impl TargetProgress {
    fn send(&self, event: ProgressEvent) {
        // The reporter only goes away at shutdown; late events are moot.
        let _ = self.tx.send(event);
    }

    pub fn started(&self) {
        self.send(ProgressEvent::TargetStarted {
            target: self.target,
        });
    }

    pub fn discovered(&self) {
        self.send(ProgressEvent::Discovered {
            target: self.target,
        });
    }

    pub fn resumed(&self) {
        self.send(ProgressEvent::Resumed {
            target: self.target,
        });
    }

    /// Withdraws a discovered leaf whose page was a listing
    pub fn relisted(&self, url: &str) {
        self.send(ProgressEvent::Relisted {
            target: self.target,
            url: url.to_string(),
        });
    }

    /// Records how a job ended
    pub fn job_finished(&self, url: &str, outcome: JobOutcome) {
        let url = url.to_string();
        let target = self.target;
        self.send(match outcome.failure_kind() {
            None => ProgressEvent::Completed { target, url },
            Some(kind) => ProgressEvent::Failed { target, url, kind },
        });
    }

    pub fn index_failed(&self, url: &str, kind: FailureKind) {
        self.send(ProgressEvent::IndexFailed {
            target: self.target,
            url: url.to_string(),
            kind,
        });
    }

    pub fn finished(&self) {
        self.send(ProgressEvent::TargetFinished {
            target: self.target,
        });
    }
}

/// Live bars: one per started target plus a global line
struct Bars {
    multi: MultiProgress,
    global: ProgressBar,
    targets: Vec<Option<ProgressBar>>,
    /// Last document finished per target, shown after the counts
    last_urls: Vec<Option<String>>,
}

impl Bars {
    fn new(target_count: usize) -> Self {
        Self::with_draw_target(target_count, ProgressDrawTarget::stderr())
    }

    fn with_draw_target(target_count: usize, draw_target: ProgressDrawTarget) -> Self {
        let multi = MultiProgress::with_draw_target(draw_target);
        let global = multi.add(ProgressBar::new_spinner());
        global.set_style(
            ProgressStyle::with_template(GLOBAL_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        global.set_prefix("all targets");
        global.enable_steady_tick(Duration::from_millis(200));

        Self {
            multi,
            global,
            targets: vec![None; target_count],
            last_urls: vec![None; target_count],
        }
    }

    fn start(&mut self, index: usize, label: &str) {
        let Some(slot) = self.targets.get_mut(index) else {
            return;
        };
        let bar = self.multi.add(ProgressBar::new(0));
        bar.set_style(
            ProgressStyle::with_template(TARGET_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        bar.set_prefix(label.to_string());
        *slot = Some(bar);
    }

    fn update(
        &mut self,
        index: usize,
        snapshot: &ProgressSnapshot,
        totals: &ProgressSnapshot,
        last_url: Option<String>,
    ) {
        if let (Some(url), Some(slot)) = (last_url, self.last_urls.get_mut(index)) {
            *slot = Some(url);
        }
        if let Some(Some(bar)) = self.targets.get(index) {
            let counts = format!("{} failed, {} on disk", snapshot.failed, snapshot.skipped_resumed);
            bar.set_length(snapshot.dispatched());
            bar.set_position(snapshot.completed + snapshot.failed);
            match self.last_urls.get(index).and_then(Option::as_deref) {
                Some(url) => bar.set_message(format!("{} | Last: {}", counts, url)),
                None => bar.set_message(counts),
            }
        }
        self.global.set_position(totals.completed + totals.failed);
        self.global.set_message(format!(
            "({} failed, {} on disk, {} index failures)",
            totals.failed, totals.skipped_resumed, totals.index_failures
        ));
    }

    fn finish(&self, index: usize, snapshot: &ProgressSnapshot) {
        if let Some(Some(bar)) = self.targets.get(index) {
            bar.finish_with_message(format!(
                "{} failed, {} on disk, {} index failures",
                snapshot.failed, snapshot.skipped_resumed, snapshot.index_failures
            ));
        }
    }
}

/// Append-only TSV of failed URLs, opened on first use
///
/// Writes go through `tokio::fs`, so a slow disk stalls only the reporter.
struct FailureLog {
    path: PathBuf,
    file: Option<File>,
    broken: bool,
}

impl FailureLog {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            file: None,
            broken: false,
        }
    }

    async fn record(&mut self, target: &str, kind: &str, url: &str) {
        if self.broken {
            return;
        }
        let line = format!(
            "{}\t{}\t{}\t{}\n",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            target,
            kind,
            url
        );
        if let Err(e) = self.append(&line).await {
            tracing::warn!(
                "Cannot write failures log {}: {}; further failures are only logged",
                self.path.display(),
                e
            );
            self.broken = true;
        }
    }

    async fn append(&mut self, line: &str) -> std::io::Result<()> {
        if self.file.is_none() {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent).await?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .await?;
            self.file = Some(file);
        }
        match self.file.as_mut() {
            Some(file) => {
                file.write_all(line.as_bytes()).await?;
                file.flush().await
            }
            None => Ok(()),
        }
    }
}

/// Owner of all progress state
pub struct ProgressReporter {
    snapshots: Vec<ProgressSnapshot>,
    totals: ProgressSnapshot,
    bars: Option<Bars>,
    failures: Option<FailureLog>,
}

impl ProgressReporter {
    /// Starts the reporter task
    ///
    /// # Arguments
    ///
    /// * `labels` - One label per target, in run order
    /// * `show` - Draw live bars on the terminal
    /// * `failures_log` - Where to append failed URLs, if anywhere
    ///
    /// # Returns
    ///
    /// The sending handle and the task, which resolves to the final snapshots
    /// once every handle is dropped.
    pub fn spawn(
        labels: Vec<String>,
        show: bool,
        failures_log: Option<PathBuf>,
    ) -> (ProgressHandle, JoinHandle<Vec<ProgressSnapshot>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let reporter = Self {
            bars: show.then(|| Bars::new(labels.len())),
            snapshots: labels.into_iter().map(ProgressSnapshot::new).collect(),
            totals: ProgressSnapshot::new("all"),
            failures: failures_log.map(FailureLog::new),
        };
        let task = tokio::spawn(reporter.run(rx));
        (ProgressHandle { tx }, task)
    }

    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<ProgressEvent>) -> Vec<ProgressSnapshot> {
        while let Some(event) = rx.recv().await {
            self.apply(event).await;
        }
        if let Some(bars) = &self.bars {
            bars.global.finish_and_clear();
        }
        self.snapshots
    }

    async fn apply(&mut self, event: ProgressEvent) {
        let index = match &event {
            ProgressEvent::TargetStarted { target }
            | ProgressEvent::Discovered { target }
            | ProgressEvent::Resumed { target }
            | ProgressEvent::Relisted { target, .. }
            | ProgressEvent::Completed { target, .. }
            | ProgressEvent::Failed { target, .. }
            | ProgressEvent::IndexFailed { target, .. }
            | ProgressEvent::TargetFinished { target } => *target,
        };
        let Some(snapshot) = self.snapshots.get_mut(index) else {
            tracing::debug!("Progress event for unknown target {}", index);
            return;
        };

        let mut last_url = None;
        match event {
            ProgressEvent::TargetStarted { .. } => {
                if let Some(bars) = self.bars.as_mut() {
                    bars.start(index, &snapshot.target);
                }
            }
            ProgressEvent::Discovered { .. } => {
                snapshot.total_discovered += 1;
                self.totals.total_discovered += 1;
            }
            ProgressEvent::Resumed { .. } => {
                snapshot.skipped_resumed += 1;
                self.totals.skipped_resumed += 1;
            }
            ProgressEvent::Relisted { url, .. } => {
                snapshot.total_discovered = snapshot.total_discovered.saturating_sub(1);
                self.totals.total_discovered = self.totals.total_discovered.saturating_sub(1);
                tracing::trace!("Withdrew {} from the document count", url);
            }
            ProgressEvent::Completed { url, .. } => {
                snapshot.completed += 1;
                self.totals.completed += 1;
                tracing::trace!("Completed {}", url);
                last_url = Some(url);
            }
            ProgressEvent::Failed { url, kind, .. } => {
                snapshot.failed += 1;
                self.totals.failed += 1;
                if let Some(log) = self.failures.as_mut() {
                    log.record(&snapshot.target, kind.as_str(), &url).await;
                }
                last_url = Some(url);
            }
            ProgressEvent::IndexFailed { url, kind, .. } => {
                snapshot.index_failures += 1;
                self.totals.index_failures += 1;
                if let Some(log) = self.failures.as_mut() {
                    log.record(&snapshot.target, &format!("index_{}", kind.as_str()), &url)
                        .await;
                }
            }
            ProgressEvent::TargetFinished { .. } => {
                if let Some(bars) = &self.bars {
                    bars.finish(index, snapshot);
                }
                return;
            }
        }

        if let Some(bars) = self.bars.as_mut() {
            bars.update(index, snapshot, &self.totals, last_url);
        }
    }
}
