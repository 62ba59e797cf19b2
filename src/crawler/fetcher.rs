//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - A `Transport` seam for a single GET, so tests can stand in for the network
//! - Retry with exponential backoff for transient failures
//! - Error classification (transient vs. permanent)

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::state::FailureKind;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors returned by a transport or by the retrying fetcher
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Malformed URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Network error for {url}: {reason}")]
    Network {
        url: String,
        reason: String,
        transient: bool,
    },

    #[error("Gave up on {url} after {attempts} attempts: {last}")]
    Exhausted {
        url: String,
        attempts: u32,
        last: Box<FetchError>,
    },
}

impl FetchError {
    /// Returns true if retrying the same request could succeed
    ///
    /// | Condition | Transient |
    /// |-----------|-----------|
    /// | HTTP 429 | yes |
    /// | HTTP 5xx | yes |
    /// | Other HTTP 4xx | no |
    /// | Timeout / connection error | yes |
    /// | Malformed URL | no |
    /// | Retries exhausted | no |
    pub fn is_transient(&self) -> bool {
        match self {
            Self::InvalidUrl { .. } | Self::Exhausted { .. } => false,
            Self::Status { status, .. } => is_transient_status(*status),
            Self::Network { transient, .. } => *transient,
        }
    }

    /// Maps the error onto the job failure taxonomy
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Exhausted { .. } => FailureKind::NetworkTransient,
            e if e.is_transient() => FailureKind::NetworkTransient,
            _ => FailureKind::NetworkPermanent,
        }
    }

    /// Number of requests made before this error surfaced
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Exhausted { attempts, .. } => *attempts,
            _ => 1,
        }
    }
}

fn is_transient_status(status: u16) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS.as_u16() || (500..600).contains(&status)
}

/// A single GET, no retries
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `timeout` - Whole-request timeout
///
/// # Example
///
/// ```no_run
/// use lex_mirror::config::UserAgentConfig;
/// use lex_mirror::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `Transport` backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(
        user_agent: &UserAgentConfig,
        crawler: &CrawlerConfig,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(
            user_agent,
            crawler.request_timeout(),
        )?))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_reqwest_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| classify_reqwest_error(url, e))?;
        Ok(body.to_vec())
    }
}

fn classify_reqwest_error(url: &Url, error: reqwest::Error) -> FetchError {
    // Builder and redirect-policy errors will not change on retry.
    let transient = !(error.is_builder() || error.is_redirect());
    let reason = if error.is_timeout() {
        "request timeout".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    };
    FetchError::Network {
        url: url.to_string(),
        reason,
        transient,
    }
}

/// Exponential backoff schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` counts the first request; values below 1 are raised to 1.
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: max_delay.max(base_delay),
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(
            config.max_attempts,
            config.backoff_base(),
            config.backoff_max(),
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Wait after the 1-indexed `attempt` failed: `base × 2^(attempt-1)`, capped
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 1u32
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&CrawlerConfig::default())
    }
}

/// A successful fetch
#[derive(Debug, Clone)]
pub struct Fetched {
    pub body: Vec<u8>,
    /// Requests made, including the successful one
    pub attempts: u32,
}

/// Retrying fetcher shared by the walker and every worker
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches a URL given as text; a malformed URL fails without a request
    pub async fn fetch(&self, url: &str) -> Result<Fetched, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        self.fetch_url(&parsed).await
    }

    /// Fetches a URL, retrying transient failures per the policy
    ///
    /// Permanent failures return immediately. When the last allowed attempt
    /// fails transiently the result is `FetchError::Exhausted`.
    pub async fn fetch_url(&self, url: &Url) -> Result<Fetched, FetchError> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.transport.get(url).await {
                Ok(body) => {
                    return Ok(Fetched {
                        body,
                        attempts: attempt,
                    })
                }
                Err(err) if err.is_transient() => {
                    if attempt >= self.policy.max_attempts {
                        tracing::warn!("Giving up on {} after {} attempts: {}", url, attempt, err);
                        return Err(FetchError::Exhausted {
                            url: url.to_string(),
                            attempts: attempt,
                            last: Box::new(err),
                        });
                    }
                    let delay = self.policy.delay_after(attempt);
                    tracing::debug!(
                        "Attempt {} for {} failed ({}), retrying in {:?}",
                        attempt,
                        url,
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    tracing::debug!("Permanent failure for {}: {}", url, err);
                    return Err(err);
                }
            }
        }
    }
}
