use std::{fmt::Display, future::Future, time::Duration};

use tracing::{debug, warn};

/// Bounded retry: how many attempts, and how long to wait after each failed
/// one (given the zero-based attempt number).
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: fn(u32) -> Duration,
}

impl RetryPolicy {
    pub fn exponential(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff: exponential_backoff,
        }
    }

    pub fn with_max_attempts(self, max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..self
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::exponential(3)
    }
}

/// `2^attempt + 1` seconds: 2s, 3s, 5s, 9s, ...
pub fn exponential_backoff(attempt: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt).saturating_add(1))
}

/// Runs `op` until it succeeds or the policy is exhausted; the last error is
/// handed to `degrade`, so the caller always gets a value back.
pub async fn retry_or_degrade<T, E, Op, Fut, D>(policy: &RetryPolicy, mut op: Op, degrade: D) -> T
where
    Op: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    D: FnOnce(E) -> T,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        match op(attempt).await {
            Ok(value) => return value,
            Err(err) => {
                warn!(
                    target: "ai",
                    attempt = attempt + 1,
                    max_attempts = attempts,
                    error = %err,
                    "attempt failed"
                );
                if attempt + 1 >= attempts {
                    return degrade(err);
                }
                let delay = (policy.backoff)(attempt);
                debug!(target: "ai", ?delay, "retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    };

    use tokio::time::Instant;

    use super::*;

    #[test]
    fn backoff_follows_power_of_two_plus_one() {
        assert_eq!(exponential_backoff(0), Duration::from_secs(2));
        assert_eq!(exponential_backoff(1), Duration::from_secs(3));
        assert_eq!(exponential_backoff(2), Duration::from_secs(5));
        assert_eq!(exponential_backoff(200), Duration::from_secs(u64::MAX));
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_without_sleeping() {
        let start = Instant::now();
        let value = retry_or_degrade(
            &RetryPolicy::default(),
            |_| async { Ok::<_, String>(7) },
            |_| 0,
        )
        .await;
        assert_eq!(value, 7);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let value = retry_or_degrade(
            &RetryPolicy::default(),
            move |_| {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err("temporary")
                    } else {
                        Ok(42)
                    }
                }
            },
            |_| -1,
        )
        .await;
        assert_eq!(value, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn degrades_after_exhaustion_with_backoff_between_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let start = Instant::now();
        let value = retry_or_degrade(
            &RetryPolicy::exponential(3),
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err::<i32, _>("down") }
            },
            |err| {
                assert_eq!(err, "down");
                -1
            },
        )
        .await;
        assert_eq!(value, -1);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 2s after the first failure, 3s after the second, none after the last
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(5) && elapsed < Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_still_tries_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let value = retry_or_degrade(
            &RetryPolicy::exponential(0),
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err::<i32, _>("down") }
            },
            |_| -1,
        )
        .await;
        assert_eq!(value, -1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
