//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `Node` / `NodeKind`: elements of the jurisdiction hierarchy being walked
//! - `Job`: one leaf document waiting to be downloaded
//! - `JobOutcome` / `FailureKind`: how a job ended

mod node;
mod outcome;

// Re-export main types
pub use node::{ChildNode, Job, Node, NodeKind};
pub use outcome::{FailureKind, JobOutcome};
