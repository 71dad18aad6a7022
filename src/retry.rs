//! Backoff for retrying failed batch writes.

use crate::config::RetrySettings;
use rand::Rng;
use std::time::Duration;

/// Exponential backoff policy used by the writer when a sink fails transiently
///
/// Internal type - users configure retries via `RetrySettings` in `AggregateConfig`.
#[derive(Debug, Clone)]
pub(crate) struct RetryStrategy {
    max_retries: u32,
    base_backoff_ms: u64,
    max_backoff_ms: u64,
    multiplier: f64,
    jitter: bool,
}

impl RetryStrategy {
    pub(crate) fn from_settings(settings: &RetrySettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            base_backoff_ms: settings.retry_backoff_ms,
            max_backoff_ms: settings.max_backoff_ms.max(settings.retry_backoff_ms),
            multiplier: 2.0,
            jitter: true,
        }
    }

    /// Disable jitter
    #[cfg(test)]
    pub(crate) fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// Backoff before retry number `attempt` (1-indexed)
    pub(crate) fn calculate_backoff(&self, attempt: u32) -> Duration {
        if attempt == 0 || self.base_backoff_ms == 0 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let mut backoff_ms = self.base_backoff_ms as f64 * self.multiplier.powi(exponent);
        backoff_ms = backoff_ms.min(self.max_backoff_ms as f64);

        if self.jitter {
            let jitter_factor = rand::rng().random_range(0.5..1.5);
            backoff_ms = (backoff_ms * jitter_factor).min(self.max_backoff_ms as f64);
        }

        Duration::from_millis(backoff_ms as u64)
    }

    /// Whether another attempt is allowed after `attempt` retries
    pub(crate) fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::from_settings(&RetrySettings::default())
    }
}
