//! Retry policy: attempt ceiling and backoff schedule.

use rand::Rng;
use std::time::Duration;

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of invocations, including the first one.
    pub max_retries: u32,
    /// Delay after the first failed attempt.
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    /// Growth factor between consecutive delays.
    pub backoff_multiplier: f64,
    /// Whether to randomize delays.
    pub use_jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(1_000),
            max_delay: Duration::from_millis(10_000),
            backoff_multiplier: 2.0,
            use_jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.use_jitter = jitter;
        self
    }

    /// Number of invocations the executor will make at most. Never below 1.
    pub fn attempt_limit(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Delay after the given failed attempt (1-based), before jitter:
    /// `min(max_delay, initial_delay * multiplier^(attempt - 1))`.
    pub fn base_delay_for(&self, attempt_number: u32) -> Duration {
        let exponent = attempt_number.saturating_sub(1).min(i32::MAX as u32) as i32;
        let factor = self.backoff_multiplier.max(0.0).powi(exponent);
        let delay_secs = self.initial_delay.as_secs_f64() * factor;
        let capped_secs = delay_secs.min(self.max_delay.as_secs_f64());

        if capped_secs.is_finite() && capped_secs > 0.0 {
            Duration::from_secs_f64(capped_secs)
        } else {
            Duration::ZERO
        }
    }

    /// Delay after the given failed attempt, with jitter applied when enabled.
    ///
    /// Jitter scales the delay by a uniform factor in `[0.5, 1.0]`, so a
    /// jittered delay never exceeds `max_delay`.
    pub fn delay_for(&self, attempt_number: u32) -> Duration {
        let base = self.base_delay_for(attempt_number);
        if !self.use_jitter || base.is_zero() {
            return base;
        }

        let factor = rand::rng().random_range(0.5..=1.0);
        base.mul_f64(factor)
    }
}
