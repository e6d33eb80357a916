// ── Retry primitive ──
//
// One loop for every site that waits on server convergence: the
// post-create and post-update read-backs, plain reads and the transport
// capacity precondition. Only errors that `CoreError::is_retryable`
// accepts are retried; the last error is returned when attempts run out.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// The same interval between every attempt.
    Fixed,
    /// `interval * factor^(n-1)` after attempt `n`, capped at `max`.
    Exponential { factor: u32, max: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub interval: Duration,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn fixed(attempts: u32, interval: Duration) -> Self {
        Self {
            attempts,
            interval,
            backoff: Backoff::Fixed,
        }
    }

    pub fn exponential(attempts: u32, interval: Duration, factor: u32, max: Duration) -> Self {
        Self {
            attempts,
            interval,
            backoff: Backoff::Exponential { factor, max },
        }
    }

    /// Delay after the given 1-based attempt fails.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.interval,
            Backoff::Exponential { factor, max } => {
                let scale = factor.saturating_pow(attempt.saturating_sub(1));
                self.interval.saturating_mul(scale).min(max)
            }
        }
    }

    /// Run `op` until it succeeds, fails terminally, or attempts run out.
    ///
    /// `op` receives the 1-based attempt number. No sleep follows the
    /// final attempt.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, CoreError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < attempts => {
                    let delay = self.delay_after(attempt);
                    debug!(
                        label,
                        attempt,
                        attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    if err.is_retryable() {
                        warn!(label, attempts, error = %err, "giving up after retries");
                    }
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use tokio::time::Instant;

    use super::*;

    const T: Duration = Duration::from_secs(3);

    #[tokio::test(start_paused = true)]
    async fn nth_attempt_result_is_returned_after_waiting() {
        let policy = RetryPolicy::fixed(4, T);
        let start = Instant::now();
        let value = policy
            .run("probe", |attempt| async move {
                if attempt < 4 {
                    Err(CoreError::pending(format!("attempt {attempt}")))
                } else {
                    Ok(attempt)
                }
            })
            .await
            .unwrap();
        assert_eq!(value, 4);
        assert!(start.elapsed() >= T * 3);
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_returns_last_error() {
        let policy = RetryPolicy::fixed(3, T);
        let start = Instant::now();
        let err = policy
            .run("probe", |attempt| async move {
                Err::<(), _>(CoreError::pending(format!("attempt {attempt}")))
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Not converged: attempt 3");
        // No sleep after the final attempt.
        assert!(start.elapsed() >= T * 2);
        assert!(start.elapsed() < T * 3);
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_errors_stop_immediately() {
        let calls = AtomicU32::new(0);
        let err = RetryPolicy::fixed(5, T)
            .run("probe", |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(CoreError::config("missing id")) }
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn exponential_delay_is_capped() {
        let policy = RetryPolicy::exponential(6, Duration::from_secs(1), 2, Duration::from_secs(5));
        assert_eq!(policy.delay_after(1), Duration::from_secs(1));
        assert_eq!(policy.delay_after(2), Duration::from_secs(2));
        assert_eq!(policy.delay_after(3), Duration::from_secs(4));
        assert_eq!(policy.delay_after(4), Duration::from_secs(5));
    }

    #[test]
    fn zero_attempts_still_runs_once() {
        let calls = AtomicU32::new(0);
        let result = tokio_test::block_on(RetryPolicy::fixed(0, T).run("probe", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, CoreError>(()) }
        }));
        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
