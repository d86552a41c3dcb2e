//! Retry timing for outbound calls.

use rand::Rng;
use std::time::Duration;

/// Longest exponent applied to the rate-limit backoff.
const MAX_BACKOFF_SHIFT: u32 = 10;

/// Delays between attempts.
///
/// A 429 waits `rate_limit_backoff * 2^(attempt - 1)` plus a uniform jitter
/// in `[0, backoff_jitter]`. Every other failure waits `retry_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub rate_limit_backoff: Duration,
    pub backoff_jitter: Duration,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            rate_limit_backoff: Duration::from_secs(1),
            backoff_jitter: Duration::from_millis(500),
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Policy without any waiting, for tests and local mocks.
    pub fn immediate() -> Self {
        Self { rate_limit_backoff: Duration::ZERO, backoff_jitter: Duration::ZERO, retry_delay: Duration::ZERO }
    }

    /// Backoff after a 429 on `attempt` (1-based).
    pub fn rate_limit_delay(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(MAX_BACKOFF_SHIFT);
        self.rate_limit_backoff.saturating_mul(1 << shift) + self.jitter()
    }

    fn jitter(&self) -> Duration {
        let max_ms = self.backoff_jitter.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..=max_ms))
    }
}
