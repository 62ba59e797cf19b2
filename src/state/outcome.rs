//! Job outcome definitions
//!
//! Every job ends in exactly one of these outcomes; the progress reporter
//! counts them and the coordinator derives the run status from the counts.

use std::fmt;

/// Classification of a failed job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Timeout, connection reset, HTTP 5xx or 429 that outlived every retry
    NetworkTransient,

    /// HTTP 4xx (other than 429) or a malformed URL
    NetworkPermanent,

    /// The page did not have the expected structure
    ParseFailed,

    /// The document could not be written to disk
    IoFailed,
}

impl FailureKind {
    /// Stable string form, used in the failures log
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkTransient => "network_transient",
            Self::NetworkPermanent => "network_permanent",
            Self::ParseFailed => "parse_failed",
            Self::IoFailed => "io_failed",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal state of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// Document fetched, parsed and renamed into place
    Completed { attempts: u32 },

    /// Job gave up; siblings are unaffected
    Failed(FailureKind),
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Completed { .. } => None,
            Self::Failed(kind) => Some(*kind),
        }
    }
}
