//! lex-mirror: a resumable mirror of state legal codes and regulations
//!
//! This crate walks the Justia hierarchy for each requested jurisdiction
//! (state → title → chapter → section), downloads every leaf document with a
//! bounded pool of workers and writes it into a directory tree that mirrors the
//! site. Completed documents are detected on disk, so an interrupted run picks up
//! where it stopped.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod targets;

use thiserror::Error;

/// Main error type for lex-mirror operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Target selection error: {0}")]
    Selection(#[from] SelectionError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Parse error: {0}")]
    Parse(#[from] crawler::ParseError),

    #[error("Write error: {0}")]
    Write(#[from] storage::WriteError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while turning a command-line selection into crawl targets
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Unknown jurisdiction code: {0}")]
    UnknownJurisdiction(String),

    #[error("Range start {from} comes after range end {to}")]
    InvertedRange { from: String, to: String },

    #[error("No jurisdictions selected")]
    Empty,
}

/// Result type alias for lex-mirror operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, RunReport, RunStatus};
pub use state::{FailureKind, JobOutcome, Node, NodeKind};
pub use targets::{CrawlTarget, Jurisdiction, Mode, Selection};
