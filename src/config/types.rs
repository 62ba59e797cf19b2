use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for lex-mirror
///
/// Every section is optional in the TOML file; missing sections and keys fall
/// back to the values in the `Default` implementations below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    pub site: SiteConfig,
}

/// Worker pool and retry behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Number of concurrent download workers
    pub workers: usize,

    /// Job queue capacity as a multiple of `workers`
    pub queue_factor: usize,

    /// Maximum attempts per request, including the first one
    pub max_attempts: u32,

    /// Delay before the first retry (milliseconds)
    pub backoff_base_ms: u64,

    /// Upper bound for any single retry delay (milliseconds)
    pub backoff_max_ms: u64,

    /// Whole-request timeout (seconds)
    pub request_timeout_secs: u64,
}

impl CrawlerConfig {
    /// Capacity of the bounded job queue between walker and workers
    pub fn queue_capacity(&self) -> usize {
        self.workers.saturating_mul(self.queue_factor).max(1)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    pub fn backoff_max(&self) -> Duration {
        Duration::from_millis(self.backoff_max_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_factor: 4,
            max_attempts: 3,
            backoff_base_ms: 500,
            backoff_max_ms: 8_000,
            request_timeout_secs: 30,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: String,

    /// Email address for crawler-related contact
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Format: CrawlerName/Version (+ContactURL; ContactEmail)
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "lex-mirror".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/lex-mirror".to_string(),
            contact_email: "ops@example.com".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Root of the mirrored directory tree
    pub root_dir: PathBuf,

    /// File (relative to `root_dir` unless absolute) that collects failed URLs
    pub failures_log: PathBuf,
}

impl OutputConfig {
    pub fn failures_log_path(&self) -> PathBuf {
        self.root_dir.join(&self.failures_log)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("./mirror"),
            failures_log: PathBuf::from("failed.tsv"),
        }
    }
}

/// Where the two content modes live on the publishing site
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Base URL for statutory codes
    pub codes_base_url: String,

    /// Base URL for administrative regulations
    pub regulations_base_url: String,

    /// Edition year of the codes to mirror
    pub codes_year: u16,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            codes_base_url: "https://law.justia.com".to_string(),
            regulations_base_url: "https://regulations.justia.com".to_string(),
            codes_year: 2023,
        }
    }
}
