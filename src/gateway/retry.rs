//! Retry with exponential backoff for rate-limited calls

use std::future::Future;
use std::time::Duration;

use super::error::GatewayError;

/// Default number of retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 2;
/// Default delay before the first retry
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Run `op`, retrying only rate-limit failures. The delay doubles after each retry.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, GatewayError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GatewayError>>,
    {
        let mut backoff = self.initial_backoff;
        let mut retries_left = self.max_retries;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && retries_left > 0 => {
                    log::warn!(
                        "gateway: {} rate limited, retrying in {:?} ({} retries left): {}",
                        label,
                        backoff,
                        retries_left,
                        e,
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                    retries_left -= 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    fn rate_limited() -> GatewayError {
        GatewayError::RateLimited("429".to_string())
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_rate_limits_with_doubling_delay() {
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let result = RetryPolicy::default()
            .run("test", || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(rate_limited())
                } else {
                    Ok(7)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 2s then 4s
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(6), "{:?}", elapsed);
        assert!(elapsed < Duration::from_millis(6_050), "{:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_bound() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = RetryPolicy::default()
            .run("test", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(rate_limited())
            })
            .await;

        assert!(matches!(result, Err(GatewayError::RateLimited(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_errors_fail_fast() {
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let result: Result<(), _> = RetryPolicy::default()
            .run("test", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(GatewayError::Api {
                    status: 500,
                    message: "boom".to_string(),
                })
            })
            .await;

        assert!(matches!(result, Err(GatewayError::Api { status: 500, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() < Duration::from_millis(1));
    }
}
