//! HTTP fetching with retry.
//!
//! Transient failures (connection errors, timeouts, non-404 error statuses)
//! are retried with linearly increasing backoff. A 404 is reported as
//! [`GemlibsError::NotFound`] immediately.

use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::{GemlibsError, Result};

/// How often and how patiently to retry transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Backoff unit; retry `n` waits `n * backoff`.
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Create a retry policy.
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Delay before the given retry (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.backoff * retry
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(500))
    }
}

/// Fetches URLs over HTTP/HTTPS, retrying transient failures.
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
    retry: RetryPolicy,
}

impl HttpFetcher {
    /// Create a new HTTP fetcher with default 30-second timeout.
    pub fn new() -> Result<Self> {
        Self::with_options(Duration::from_secs(30), RetryPolicy::default())
    }

    /// Create a new HTTP fetcher with a custom timeout and retry policy.
    ///
    /// Redirects are followed up to the retry budget.
    pub fn with_options(timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("gemlibs/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .redirect(Policy::limited(retry.max_retries.max(1) as usize))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            timeout,
            retry,
        })
    }

    /// Get the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the retry policy.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Fetch a URL's body as bytes.
    pub fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        self.with_retry(url, || self.attempt(url))
    }

    /// Fetch a URL and decode its body as JSON.
    pub fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.get_bytes(url)?;
        serde_json::from_slice(&body)
            .map_err(|e| anyhow::anyhow!("Invalid JSON from {}: {}", url, e).into())
    }

    fn with_retry<T>(&self, url: &str, op: impl Fn() -> Result<T>) -> Result<T> {
        let mut retry = 0;
        loop {
            match op() {
                Err(e) if e.is_transient() && retry < self.retry.max_retries => {
                    retry += 1;
                    let delay = self.retry.delay_for(retry);
                    tracing::debug!(
                        "{}; retry {}/{} for {} in {:?}",
                        e,
                        retry,
                        self.retry.max_retries,
                        url,
                        delay
                    );
                    std::thread::sleep(delay);
                }
                result => return result,
            }
        }
    }

    fn attempt(&self, url: &str) -> Result<Vec<u8>> {
        let transient = |message: String| GemlibsError::TransientFetch {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| transient(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(GemlibsError::NotFound {
                what: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(transient(format!("HTTP {}", status)));
        }

        let body = response.bytes().map_err(|e| transient(e.to_string()))?;
        Ok(body.to_vec())
    }
}
