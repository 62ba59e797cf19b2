//! Configuration module for lex-mirror
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; an absent file means "all defaults".
//!
//! # Example
//!
//! ```no_run
//! use lex_mirror::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("lex-mirror.toml")).unwrap();
//! println!("Downloading with {} workers", config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
