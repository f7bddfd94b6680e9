use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// How often a failed fetch is attempted again before giving up until the
/// next scheduled refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: usize,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            retries: 0,
            delay: Duration::ZERO,
        }
    }

    pub fn new(retries: usize, delay_ms: u64) -> Self {
        Self {
            retries,
            delay: Duration::from_millis(delay_ms),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// Retries an async operation according to `policy`
///
/// Total runs are `1 + policy.retries`; the last error is returned when all
/// attempts fail.
pub async fn with_retry<F, Fut, T>(mut operation: F, policy: RetryPolicy) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(err) => {
                if attempt > policy.retries {
                    return Err(err);
                }
                debug!(
                    "Attempt {}/{} failed: {}. Retrying...",
                    attempt, policy.retries, err
                );
                attempt += 1;
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}
