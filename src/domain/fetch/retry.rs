//! Retry policy for asset fetches

use std::time::Duration;

use rand::Rng;
use serde::Deserialize;

/// Retry and timeout settings for a single URL
///
/// Delays grow linearly with the attempt number and carry a random jitter
/// of up to one base delay, so concurrent callers do not retry in lockstep.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Base unit for backoff and jitter
    pub base_delay_ms: u64,
    /// Per-attempt wait before the request is aborted
    pub timeout_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            timeout_ms: 15_000,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    pub fn with_base_delay(mut self, ms: u64) -> Self {
        self.base_delay_ms = ms;
        self
    }

    pub fn with_timeout(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }

    /// Attempt ceiling; a policy never makes fewer than one attempt
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Delay after the given failed attempt (1-indexed) with explicit jitter
    pub fn delay_with_jitter(&self, attempt: u32, jitter_ms: u64) -> Duration {
        let linear = self.base_delay_ms.saturating_mul(attempt as u64);
        Duration::from_millis(linear.saturating_add(jitter_ms.min(self.base_delay_ms)))
    }

    /// Delay after the given failed attempt, jitter drawn from `[0, base)`
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let jitter_ms = if self.base_delay_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..self.base_delay_ms)
        };

        self.delay_with_jitter(attempt, jitter_ms)
    }
}
