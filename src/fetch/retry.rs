use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::Fetcher;
use crate::error::FetchError;

/// Bounded exponential backoff: attempt `n` failing waits
/// `initial_backoff * multiplier^(n-1)` before attempt `n + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts,
            initial_backoff,
            ..Self::default()
        }
    }

    /// Delay after the given failed attempt (1-based).
    pub fn backoff_for(&self, failed_attempt: u32) -> Duration {
        let exponent = failed_attempt.saturating_sub(1);
        let factor = self.multiplier.max(1).saturating_pow(exponent);
        self.initial_backoff.saturating_mul(factor)
    }
}

async fn retry_with<T, F>(
    fetcher: &dyn Fetcher,
    path: &str,
    policy: &RetryPolicy,
    parse: F,
) -> Result<T, FetchError>
where
    T: Send,
    F: Fn(&str, String) -> Result<T, FetchError> + Send + Sync,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        let outcome = match fetcher.fetch(path).await {
            Ok(body) => parse(path, body),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(value) => {
                if attempt > 1 {
                    debug!(path, attempt, "Fetch succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if attempt < attempts => {
                let delay = policy.backoff_for(attempt);
                warn!(
                    path,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Fetch failed, retrying: {}",
                    e
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                warn!(path, attempt, "Fetch failed, giving up: {}", e);
                return Err(e);
            }
        }
    }
}

/// Fetch `path`, retrying network failures per `policy`.
pub async fn fetch_with_retry(
    fetcher: &dyn Fetcher,
    path: &str,
    policy: &RetryPolicy,
) -> Result<String, FetchError> {
    retry_with(fetcher, path, policy, |_, body| Ok(body)).await
}

/// Fetch and decode JSON. A parse failure is retried like a network failure.
pub async fn fetch_json_with_retry<T>(
    fetcher: &dyn Fetcher,
    path: &str,
    policy: &RetryPolicy,
) -> Result<T, FetchError>
where
    T: DeserializeOwned + Send,
{
    retry_with(fetcher, path, policy, |path, body| {
        serde_json::from_str(&body).map_err(|source| FetchError::Parse {
            path: path.to_string(),
            source,
        })
    })
    .await
}
