// src/utils/retry.rs

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::repository::StoreError;

/// Upper bound for a single backoff sleep.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Bounded retry policy applied to every store call.
///
/// The first attempt runs immediately. After each transient failure the
/// caller sleeps `delay`, then the delay is multiplied by `backoff`,
/// saturating at [`MAX_RETRY_DELAY`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryStrategy {
    attempts: u32,
    delay: Duration,
    backoff: f64,
}

impl RetryStrategy {
    pub fn new(attempts: u32, delay: Duration, backoff: f64) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
            backoff: if backoff.is_finite() && backoff >= 1.0 { backoff } else { 1.0 },
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn backoff(&self) -> f64 {
        self.backoff
    }

    fn next_delay(&self, delay: Duration) -> Duration {
        Duration::try_from_secs_f64(delay.as_secs_f64() * self.backoff)
            .unwrap_or(MAX_RETRY_DELAY)
            .min(MAX_RETRY_DELAY)
    }
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(100), 1.5)
    }
}

/// Runs `op` under `strategy`, retrying only transient store failures.
///
/// Cancellation is observed before every attempt, while an attempt is in
/// flight and during backoff sleeps. A cancelled call returns
/// [`StoreError::Cancelled`] without spending the remaining attempts.
pub async fn with_retry<T, F, Fut>(
    strategy: &RetryStrategy,
    cancel: &CancellationToken,
    operation: &'static str,
    mut op: F,
) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let mut delay = strategy.delay;
    let mut attempt = 1;

    loop {
        if cancel.is_cancelled() {
            return Err(StoreError::Cancelled);
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(StoreError::Cancelled),
            result = op() => result,
        };

        match result {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < strategy.attempts => {
                tracing::warn!(
                    operation,
                    attempt,
                    max_attempts = strategy.attempts,
                    retry_in_ms = delay.as_millis() as u64,
                    "Transient store error, retrying: {}",
                    err
                );

                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(StoreError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }

                delay = strategy.next_delay(delay);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
