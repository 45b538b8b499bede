//! Retry policy for transient AAP request failures.
//!
//! Implements exponential backoff with a bounded ceiling. The schedule is a
//! pure function of the retry count so it can be tested without real
//! network timing.

use std::time::Duration;

use super::error::AapError;

/// Retry policy implementing exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retries before the failure surfaces.
    pub max_retries: u32,
    /// Initial backoff duration in milliseconds.
    pub base_delay_ms: u64,
    /// Maximum backoff duration in milliseconds (cap for exponential growth).
    pub max_delay_ms: u64,
    /// Multiplier applied to the backoff after each retry.
    pub multiplier: f64,
}

impl RetryPolicy {
    /// Create a policy with the default schedule and the given retry count.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Backoff duration before retry number `retry_count` (0-based).
    ///
    /// `base_delay * multiplier^retry_count`, capped at `max_delay_ms`.
    pub fn backoff_delay(&self, retry_count: u32) -> Duration {
        let delay = self.base_delay_ms as f64 * self.multiplier.powi(retry_count as i32);
        Duration::from_millis(delay.min(self.max_delay_ms as f64) as u64)
    }

    /// Whether a failed attempt should be retried.
    ///
    /// True only when the error is transient and the retry budget is not
    /// exhausted.
    pub fn should_retry(&self, error: &AapError, retry_count: u32) -> bool {
        error.is_retryable() && retry_count < self.max_retries
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 500,
            max_delay_ms: 10_000,
            multiplier: 2.0,
        }
    }
}
