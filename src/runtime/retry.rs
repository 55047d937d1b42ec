use super::worker_primitives::pause;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    Fixed(Duration),
    /// Doubles after every retry, capped at `max`.
    Exponential { initial: Duration, max: Duration },
}

impl Backoff {
    /// Delay before retry number `retry` (1-based).
    pub fn delay(&self, retry: u32) -> Duration {
        match *self {
            Self::Fixed(delay) => delay,
            Self::Exponential { initial, max } => {
                let factor = 1u32.checked_shl(retry.saturating_sub(1)).unwrap_or(u32::MAX);
                initial.saturating_mul(factor).min(max)
            }
        }
    }
}

/// Bounded retry around a single fallible call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

/// How a retried call ended.
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    pub result: Result<T, E>,
    pub attempts: u32,
}

impl RetryPolicy {
    pub const fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Fixed(delay),
        }
    }

    /// Calls `op` until it succeeds, fails with an error `is_retryable`
    /// rejects, or `max_attempts` is reached. `on_retry` sees each retryable
    /// failure with its attempt number before the pause. A raised `stop`
    /// ends the pause early and returns the pending error.
    pub fn run<T, E, F, P, R>(
        &self,
        stop: Option<&AtomicBool>,
        mut op: F,
        is_retryable: P,
        mut on_retry: R,
    ) -> RetryOutcome<T, E>
    where
        F: FnMut(u32) -> Result<T, E>,
        P: Fn(&E) -> bool,
        R: FnMut(u32, &E, Duration),
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op(attempt) {
                Ok(value) => {
                    return RetryOutcome {
                        result: Ok(value),
                        attempts: attempt,
                    }
                }
                Err(err) if is_retryable(&err) && attempt < max_attempts => {
                    let delay = self.backoff.delay(attempt);
                    on_retry(attempt, &err, delay);
                    if !pause(stop, delay) {
                        return RetryOutcome {
                            result: Err(err),
                            attempts: attempt,
                        };
                    }
                    attempt += 1;
                }
                Err(err) => {
                    return RetryOutcome {
                        result: Err(err),
                        attempts: attempt,
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_backoff_doubles_and_caps() {
        let backoff = Backoff::Exponential {
            initial: Duration::from_millis(100),
            max: Duration::from_millis(1000),
        };
        assert_eq!(backoff.delay(1), Duration::from_millis(100));
        assert_eq!(backoff.delay(2), Duration::from_millis(200));
        assert_eq!(backoff.delay(4), Duration::from_millis(800));
        assert_eq!(backoff.delay(5), Duration::from_millis(1000));
        assert_eq!(backoff.delay(40), Duration::from_millis(1000));
    }

    #[test]
    fn stops_after_max_attempts_with_last_error() {
        let policy = RetryPolicy::fixed(3, Duration::from_millis(1));
        let outcome: RetryOutcome<(), u32> =
            policy.run(None, Err, |_| true, |_, _, _| {});
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.result.expect_err("exhausted"), 3);
    }

    #[test]
    fn non_retryable_error_ends_immediately() {
        let policy = RetryPolicy::fixed(5, Duration::from_millis(1));
        let mut retries = 0;
        let outcome: RetryOutcome<(), &str> = policy.run(
            None,
            |_| Err("fatal"),
            |err| *err != "fatal",
            |_, _, _| retries += 1,
        );
        assert_eq!(outcome.attempts, 1);
        assert_eq!(retries, 0);
        assert!(outcome.result.is_err());
    }

    #[test]
    fn raised_stop_flag_cuts_the_pause() {
        let stop = AtomicBool::new(true);
        let policy = RetryPolicy::fixed(10, Duration::from_secs(60));
        let outcome: RetryOutcome<(), &str> =
            policy.run(Some(&stop), |_| Err("busy"), |_| true, |_, _, _| {});
        assert_eq!(outcome.attempts, 1);
        assert!(outcome.result.is_err());
    }
}
