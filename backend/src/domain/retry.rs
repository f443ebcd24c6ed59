//! Bounded retries with exponential backoff for transient repository
//! failures.
//!
//! Only errors that report themselves as [`Transient`] are retried; anything
//! else is returned on the first failure.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Classifies errors that may succeed when retried.
pub trait Transient {
    /// Whether retrying the failed operation may succeed.
    fn is_transient(&self) -> bool;
}

/// Retry schedule.
///
/// The delay after failed attempt `i` (0-based) is
/// `min(initial_delay * 2^i, max_delay)`. No delay follows the final attempt.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use whoami::domain::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.delay_for(0), Duration::from_millis(1000));
/// assert_eq!(policy.delay_for(1), Duration::from_millis(2000));
/// assert_eq!(policy.delay_for(5), Duration::from_millis(10_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(1000), Duration::from_millis(10_000))
    }
}

impl RetryPolicy {
    /// Build a policy. `max_attempts` is clamped to at least one.
    pub const fn new(max_attempts: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
            initial_delay,
            max_delay,
        }
    }

    /// Same attempt budget as the default but without sleeping.
    pub const fn immediate() -> Self {
        Self::new(3, Duration::ZERO, Duration::ZERO)
    }

    /// Maximum number of attempts, including the first.
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Backoff after failed attempt `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2_u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    /// Run `operation` until it succeeds, fails permanently, or the attempt
    /// budget is spent.
    pub async fn run<T, E, F, Fut>(&self, label: &'static str, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Transient + Display,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_transient() && attempt + 1 < self.max_attempts => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        operation = label,
                        attempt = attempt + 1,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %error,
                        "transient failure, retrying"
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Schedule and classification coverage.
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use rstest::rstest;

    #[derive(Debug, thiserror::Error)]
    enum FakeError {
        #[error("connection reset")]
        Transient,
        #[error("syntax error")]
        Permanent,
    }

    impl Transient for FakeError {
        fn is_transient(&self) -> bool {
            matches!(self, Self::Transient)
        }
    }

    #[rstest]
    #[case(0, 1000)]
    #[case(1, 2000)]
    #[case(2, 4000)]
    #[case(3, 8000)]
    #[case(4, 10_000)]
    #[case(40, 10_000)]
    fn default_schedule_doubles_and_caps(#[case] attempt: u32, #[case] millis: u64) {
        assert_eq!(
            RetryPolicy::default().delay_for(attempt),
            Duration::from_millis(millis)
        );
    }

    #[rstest]
    fn zero_attempts_still_runs_once() {
        let policy = RetryPolicy::new(0, Duration::ZERO, Duration::ZERO);
        assert_eq!(policy.max_attempts(), 1);
    }

    #[tokio::test]
    async fn transient_errors_exhaust_the_budget() {
        let calls = AtomicU32::new(0);
        let result: Result<(), FakeError> = RetryPolicy::immediate()
            .run("test", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FakeError::Transient)
            })
            .await;
        assert!(matches!(result, Err(FakeError::Transient)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_errors_return_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<(), FakeError> = RetryPolicy::immediate()
            .run("test", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FakeError::Permanent)
            })
            .await;
        assert!(matches!(result, Err(FakeError::Permanent)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recovers_after_a_transient_failure() {
        let calls = AtomicU32::new(0);
        let result = RetryPolicy::immediate()
            .run("test", || async {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(FakeError::Transient)
                } else {
                    Ok(7)
                }
            })
            .await;
        assert_eq!(result.expect("second attempt succeeds"), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
