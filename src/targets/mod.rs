//! Crawl targets
//!
//! A target is one jurisdiction in one content mode. This module holds the
//! canonical jurisdiction list, turns a command-line selection into
//! jurisdictions, and builds the root URL each target starts from.

mod jurisdiction;
mod selection;

pub use jurisdiction::{find, Jurisdiction, JURISDICTIONS};
pub use selection::Selection;

use crate::config::SiteConfig;
use crate::state::Node;
use std::fmt;
use url::Url;

/// Which body of law to mirror
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Statutory codes
    Codes,

    /// Administrative regulations
    Regulations,
}

impl Mode {
    /// Top-level directory for this mode; the two trees never overlap
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Codes => "codes",
            Self::Regulations => "regulations",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// One requested top-level unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    pub jurisdiction: Jurisdiction,
    pub mode: Mode,
    pub root_url: Url,
}

impl CrawlTarget {
    /// Builds the target for `jurisdiction` using the site layout:
    /// codes at `{codes}/codes/{slug}/{year}/`, regulations at
    /// `{regulations}/states/{slug}/`.
    pub fn new(
        jurisdiction: Jurisdiction,
        mode: Mode,
        site: &SiteConfig,
    ) -> Result<Self, url::ParseError> {
        let root = match mode {
            Mode::Codes => format!(
                "{}/codes/{}/{}/",
                site.codes_base_url.trim_end_matches('/'),
                jurisdiction.slug,
                site.codes_year
            ),
            Mode::Regulations => format!(
                "{}/states/{}/",
                site.regulations_base_url.trim_end_matches('/'),
                jurisdiction.slug
            ),
        };

        Ok(Self {
            jurisdiction,
            mode,
            root_url: Url::parse(&root)?,
        })
    }

    /// Creates a target with an explicit root URL
    pub fn with_root(jurisdiction: Jurisdiction, mode: Mode, root_url: Url) -> Self {
        Self {
            jurisdiction,
            mode,
            root_url,
        }
    }

    /// Short label used in logs and progress bars, e.g. `TX/codes`
    pub fn label(&self) -> String {
        format!("{}/{}", self.jurisdiction.code, self.mode)
    }

    /// Root node of this target's hierarchy
    pub fn root_node(&self) -> Node {
        Node::root(
            self.root_url.clone(),
            self.jurisdiction.name,
            self.jurisdiction.code,
        )
    }
}

/// Builds one target per selected jurisdiction, in selection order
pub fn build_targets(
    jurisdictions: &[Jurisdiction],
    mode: Mode,
    site: &SiteConfig,
) -> Result<Vec<CrawlTarget>, url::ParseError> {
    jurisdictions
        .iter()
        .map(|j| CrawlTarget::new(*j, mode, site))
        .collect()
}
