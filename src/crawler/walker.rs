//! Lazy depth-first walk of one target's hierarchy
//!
//! The walker keeps an explicit stack of frames, each holding a node and the
//! children it has not visited yet. Listing pages are fetched only when their
//! node is reached, so memory stays proportional to the depth of the tree and
//! the width of the open listings, not to the size of the site.
//!
//! Leaves become jobs on the bounded queue. Sending suspends while the queue
//! is full, which throttles discovery to the speed of the workers.
//!
//! Every child of a listing gets a path segment that no sibling shares, so no
//! two jobs ever target the same file.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{PageParser, ParseError};
use crate::output::TargetProgress;
use crate::state::{ChildNode, FailureKind, Job, Node};
use crate::storage::layout::SiblingSegments;
use crate::storage::{destination_path, ResumeStore};
use crate::targets::CrawlTarget;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Guard against listings whose "next" links loop forever
const MAX_LISTING_PAGES: usize = 1_000;

/// Counters for one walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub listings_expanded: u64,
    pub jobs_emitted: u64,
    pub resumed: u64,
    pub index_failures: u64,
    pub cancelled: bool,
}

/// A child waiting to be visited, with its assigned path segment
type PendingChild = (ChildNode, String);

struct Frame {
    node: Arc<Node>,
    pending: std::vec::IntoIter<PendingChild>,
}

enum Visit {
    Expanded(Frame),
    Done,
    Cancelled,
}

enum ExpandError {
    DocumentPage,
    Failed { kind: FailureKind, reason: String },
}

/// Walks one target at a time
pub struct TreeWalker {
    fetcher: Arc<Fetcher>,
    parser: Arc<dyn PageParser>,
    resume: Arc<dyn ResumeStore>,
    root_dir: PathBuf,
    cancel: CancellationToken,
}

impl TreeWalker {
    pub fn new(
        fetcher: Arc<Fetcher>,
        parser: Arc<dyn PageParser>,
        resume: Arc<dyn ResumeStore>,
        root_dir: PathBuf,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            fetcher,
            parser,
            resume,
            root_dir,
            cancel,
        }
    }

    /// Walks `target`, sending a job for every leaf that is not on disk yet
    ///
    /// The sender is dropped on return, which closes the queue once the
    /// workers drain it.
    pub async fn walk(
        &self,
        target: &CrawlTarget,
        jobs: mpsc::Sender<Job>,
        progress: &TargetProgress,
    ) -> WalkStats {
        tracing::info!("Walking {} from {}", target.label(), target.root_url);
        self.walk_from(target, vec![target.root_node()], jobs, progress)
            .await
    }

    /// Walks the subtrees under `roots` in order
    ///
    /// Used for the root of a target and for leaves that workers found to be
    /// listings; each root keeps the path segments it already has.
    pub async fn walk_from(
        &self,
        target: &CrawlTarget,
        roots: Vec<Node>,
        jobs: mpsc::Sender<Job>,
        progress: &TargetProgress,
    ) -> WalkStats {
        let mut stats = WalkStats::default();
        let mut stack: Vec<Frame> = Vec::new();
        let mut roots = roots.into_iter();

        let mut next = roots.next();
        loop {
            if let Some(node) = next.take() {
                if self.cancel.is_cancelled() {
                    stats.cancelled = true;
                    break;
                }
                match self.visit(node, target, &jobs, progress, &mut stats).await {
                    Visit::Expanded(frame) => stack.push(frame),
                    Visit::Done => {}
                    Visit::Cancelled => {
                        stats.cancelled = true;
                        break;
                    }
                }
            }

            match stack.last_mut() {
                Some(frame) => match frame.pending.next() {
                    Some((child, segment)) => {
                        next = Some(Node::child_at(&frame.node, child, segment))
                    }
                    None => {
                        stack.pop();
                    }
                },
                None => match roots.next() {
                    Some(root) => next = Some(root),
                    None => break,
                },
            }
        }

        if stats.cancelled {
            tracing::info!("Walk of {} cancelled", target.label());
        } else {
            tracing::info!(
                "Walk of {} finished: {} listings, {} jobs, {} already on disk, {} index failures",
                target.label(),
                stats.listings_expanded,
                stats.jobs_emitted,
                stats.resumed,
                stats.index_failures
            );
        }
        stats
    }

    async fn visit(
        &self,
        node: Node,
        target: &CrawlTarget,
        jobs: &mpsc::Sender<Job>,
        progress: &TargetProgress,
        stats: &mut WalkStats,
    ) -> Visit {
        if node.kind.is_leaf() {
            return self.emit_leaf(node, target, jobs, progress, stats).await;
        }

        let expanded = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Visit::Cancelled,
            expanded = self.expand(&node) => expanded,
        };

        match expanded {
            Ok(children) => {
                stats.listings_expanded += 1;
                tracing::debug!(
                    "{} ({}, depth {}) has {} children",
                    node.url,
                    node.kind,
                    node.depth(),
                    children.len()
                );
                Visit::Expanded(Frame {
                    node: Arc::new(node),
                    pending: children.into_iter(),
                })
            }
            Err(ExpandError::DocumentPage) => {
                tracing::debug!("{} is a document page, treating it as a leaf", node.url);
                self.emit_leaf(node.into_leaf(), target, jobs, progress, stats)
                    .await
            }
            Err(ExpandError::Failed { kind, reason }) => {
                match node.parent() {
                    _ if node.is_root() => {
                        tracing::warn!("Cannot read the root listing of {}: {}", target.label(), reason)
                    }
                    Some(parent) => tracing::warn!(
                        "Skipping subtree at {} (listed on {}): {}",
                        node.url,
                        parent.url,
                        reason
                    ),
                    None => tracing::warn!("Skipping subtree at {}: {}", node.url, reason),
                }
                stats.index_failures += 1;
                progress.index_failed(node.url.as_str(), kind);
                Visit::Done
            }
        }
    }

    /// Fetches every page of a listing and collects its children
    async fn expand(&self, node: &Node) -> Result<Vec<PendingChild>, ExpandError> {
        let mut children = Vec::new();
        let mut segments = SiblingSegments::new();
        let mut seen_children: HashSet<Url> = HashSet::new();
        let mut seen_pages: HashSet<Url> = HashSet::new();
        let mut page = node.url.clone();

        loop {
            seen_pages.insert(page.clone());

            let fetched = self
                .fetcher
                .fetch_url(&page)
                .await
                .map_err(|e| ExpandError::Failed {
                    kind: e.failure_kind(),
                    reason: e.to_string(),
                })?;

            let listing = match self.parser.discover_children(&page, node.kind, &fetched.body) {
                Ok(listing) => listing,
                Err(ParseError::DocumentPage { .. }) if page == node.url => {
                    return Err(ExpandError::DocumentPage)
                }
                Err(e) => {
                    return Err(ExpandError::Failed {
                        kind: FailureKind::ParseFailed,
                        reason: e.to_string(),
                    })
                }
            };

            for child in listing.children {
                if seen_children.insert(child.url.clone()) {
                    let segment = segments.assign(&child.url, &child.name, child.kind.is_leaf());
                    children.push((child, segment));
                }
            }

            match listing.next_page {
                Some(next) if !seen_pages.contains(&next) => {
                    if seen_pages.len() >= MAX_LISTING_PAGES {
                        tracing::warn!(
                            "{} has more than {} pages, stopping pagination",
                            node.url,
                            MAX_LISTING_PAGES
                        );
                        break;
                    }
                    tracing::trace!("Following pagination {} -> {}", page, next);
                    page = next;
                }
                _ => break,
            }
        }

        Ok(children)
    }

    async fn emit_leaf(
        &self,
        node: Node,
        target: &CrawlTarget,
        jobs: &mpsc::Sender<Job>,
        progress: &TargetProgress,
        stats: &mut WalkStats,
    ) -> Visit {
        let destination = destination_path(&self.root_dir, target.mode, &node.path_segments);
        progress.discovered();

        if self.resume.exists(&destination).await {
            tracing::trace!("Already on disk: {}", destination.display());
            stats.resumed += 1;
            progress.resumed();
            return Visit::Done;
        }

        let job = Job::new(node, destination);
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Visit::Cancelled,
            sent = jobs.send(job) => match sent {
                Ok(()) => {
                    stats.jobs_emitted += 1;
                    Visit::Done
                }
                Err(_) => {
                    tracing::warn!("Job queue closed early, stopping walk of {}", target.label());
                    Visit::Cancelled
                }
            },
        }
    }
}
