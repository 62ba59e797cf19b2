//! Storage module for persisting mirrored documents
//!
//! This module handles everything the crawler does on disk:
//! - Deriving a deterministic destination path for each leaf
//! - Answering "is this leaf already downloaded" for resumption
//! - Writing documents atomically so an interrupted run never leaves a
//!   truncated file that would later be mistaken for a finished one

pub mod layout;
mod resume;
mod writer;

pub use layout::{destination_path, sanitize_segment};
pub use resume::{FsResumeStore, NoResume, ResumeStore};
pub use writer::{write_atomic, WriteError};
