//! Crawler module: the concurrent crawl-and-download engine
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry and backoff
//! - Site-specific page parsing behind the `PageParser` trait
//! - The lazy depth-first walk that discovers leaf documents
//! - The bounded worker pool that downloads them
//! - Overall run coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;
mod walker;

pub use coordinator::{Coordinator, RunReport, RunStatus};
pub use fetcher::{
    build_http_client, FetchError, Fetched, Fetcher, HttpTransport, RetryPolicy, Transport,
};
pub use parser::{parser_for, CodesParser, Listing, PageParser, ParseError, RegulationsParser};
pub use scheduler::{PoolStats, WorkerContext, WorkerPool};
pub use walker::{TreeWalker, WalkStats};

use crate::config::Config;
use crate::targets::CrawlTarget;
use crate::HarvestError;

/// Runs a complete mirror operation over HTTP
///
/// This is the main entry point for library users. It will:
/// 1. Build the HTTP client from the configuration
/// 2. Walk each target's hierarchy in order
/// 3. Download every leaf not already on disk
/// 4. Return the per-target report
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `targets` - Targets to process, in order
///
/// # Returns
///
/// * `Ok(RunReport)` - The run finished or was interrupted
/// * `Err(HarvestError)` - The HTTP client could not be built
pub async fn mirror(config: Config, targets: &[CrawlTarget]) -> Result<RunReport, HarvestError> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run(targets).await)
}
