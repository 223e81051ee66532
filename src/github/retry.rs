//! Bounded retry on rate limiting

use super::SourceError;
use crate::clock::Sleeper;
use crate::config::RetryConfig;
use std::time::Duration;
use tracing::warn;

/// How often and how long to wait on a rate-limited request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Attempts including the first one
    pub max_attempts: u32,
    /// Cap on a single wait
    pub max_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryConfig::default().into()
    }
}

impl From<RetryConfig> for RetryPolicy {
    fn from(config: RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            max_wait: config.max_wait,
        }
    }
}

/// Run `op`, sleeping and retrying while it reports a rate limit.
///
/// Only [`SourceError::RateLimited`] is retried. After `max_attempts` the
/// last error is returned as is.
pub fn with_retry<T, F>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    mut op: F,
) -> Result<T, SourceError>
where
    F: FnMut() -> Result<T, SourceError>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op() {
            Err(SourceError::RateLimited { retry_after }) if attempt < max_attempts => {
                let wait = retry_after.min(policy.max_wait);
                warn!(
                    "GitHub rate limit hit, waiting {}s before retrying (attempt {}/{})",
                    wait.as_secs(),
                    attempt + 1,
                    max_attempts
                );
                sleeper.sleep(wait);
                attempt += 1;
            }
            result => return result,
        }
    }
}
