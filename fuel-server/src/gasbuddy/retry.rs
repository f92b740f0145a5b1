//! Exponential backoff for transient transport failures.
//!
//! The upstream site occasionally drops connections; both the token fetch
//! and the GraphQL call retry those with the same envelope: at most five
//! attempts within a sixty-second budget. HTTP error statuses and payload
//! problems are never retried here.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::warn;

/// Retry envelope applied to one whole call.
#[derive(Debug, Clone)]
pub struct Backoff {
    /// Maximum number of attempts (first try included).
    pub max_tries: u32,

    /// Ceiling on total time spent, sleeps included.
    pub max_elapsed: Duration,

    /// Delay before the first retry.
    pub initial_delay: Duration,

    /// Growth factor between retries.
    pub multiplier: f64,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            max_tries: 5,
            max_elapsed: Duration::from_secs(60),
            initial_delay: Duration::from_secs(1),
            multiplier: 2.0,
        }
    }
}

impl Backoff {
    /// Delay before the retry following attempt `attempt` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let millis = self.initial_delay.as_millis() as f64 * self.multiplier.powi(attempt as i32);
        Duration::from_millis(millis as u64)
    }
}

/// Run `op`, retrying while `is_transient` says the error is worth another
/// attempt and the envelope has budget left. The final error is returned
/// unchanged once the envelope is exhausted.
pub async fn with_backoff<F, Fut, T, E>(
    policy: &Backoff,
    is_transient: impl Fn(&E) -> bool,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let start = Instant::now();
    let mut attempt = 0u32;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_transient(&err) || attempt + 1 >= policy.max_tries {
                    return Err(err);
                }

                let delay = policy.delay_for_attempt(attempt);
                if start.elapsed() + delay > policy.max_elapsed {
                    warn!(attempt, error = %err, "retry budget exhausted");
                    return Err(err);
                }

                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "transient transport error, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug)]
    struct TestError {
        transient: bool,
    }

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "test error")
        }
    }

    fn fast_policy() -> Backoff {
        Backoff {
            max_tries: 5,
            max_elapsed: Duration::from_secs(60),
            initial_delay: Duration::from_millis(1),
            multiplier: 2.0,
        }
    }

    #[test]
    fn delay_progression_doubles() {
        let policy = Backoff::default();
        assert_eq!(policy.delay_for_attempt(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_secs(8));
    }

    #[tokio::test]
    async fn succeeds_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let count = Arc::clone(&calls);

        let result = with_backoff(&fast_policy(), |_: &TestError| true, || {
            let count = Arc::clone(&count);
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Ok::<_, TestError>(7)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_transient_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let count = Arc::clone(&calls);

        let result = with_backoff(&fast_policy(), |_: &TestError| true, || {
            let count = Arc::clone(&count);
            async move {
                if count.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(TestError { transient: true })
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_tries() {
        let calls = Arc::new(AtomicU32::new(0));
        let count = Arc::clone(&calls);

        let result: Result<u32, TestError> = with_backoff(&fast_policy(), |_| true, || {
            let count = Arc::clone(&count);
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Err(TestError { transient: true })
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn non_transient_errors_fail_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let count = Arc::clone(&calls);

        let result: Result<u32, TestError> =
            with_backoff(&fast_policy(), |e: &TestError| e.transient, || {
                let count = Arc::clone(&count);
                async move {
                    count.fetch_add(1, Ordering::SeqCst);
                    Err(TestError { transient: false })
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn elapsed_budget_caps_retries() {
        let policy = Backoff {
            max_tries: 5,
            max_elapsed: Duration::from_millis(5),
            initial_delay: Duration::from_millis(50),
            multiplier: 2.0,
        };
        let calls = Arc::new(AtomicU32::new(0));
        let count = Arc::clone(&calls);

        let result: Result<u32, TestError> = with_backoff(&policy, |_| true, || {
            let count = Arc::clone(&count);
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Err(TestError { transient: true })
            }
        })
        .await;

        // The first retry's delay alone would blow the budget.
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
