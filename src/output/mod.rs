//! Output module for progress and run summaries
//!
//! This module handles:
//! - Aggregating progress events from the walker and workers
//! - Drawing live progress bars
//! - Recording failed URLs in an append-only log
//! - Printing the end-of-run summary

mod progress;
mod summary;

pub use progress::{ProgressEvent, ProgressHandle, ProgressReporter, ProgressSnapshot, TargetProgress};
pub use summary::{format_summary, print_summary};
