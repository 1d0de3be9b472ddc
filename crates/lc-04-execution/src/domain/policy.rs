//! Retry policy with validation.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::errors::ExecutionError;

/// Upper bound for `overall_timeout` and `max_backoff`.
pub const MAX_POLICY_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

/// Budget and pacing for one execution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Wait after the first failed attempt
    #[serde(with = "humantime_serde")]
    pub initial_backoff: Duration,
    /// Growth factor between consecutive waits
    pub backoff_multiplier: f64,
    /// Ceiling for a single wait
    #[serde(with = "humantime_serde")]
    pub max_backoff: Duration,
    /// Wall-clock budget for the whole execution
    #[serde(with = "humantime_serde")]
    pub overall_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            initial_backoff: Duration::from_millis(250),
            backoff_multiplier: 2.0,
            max_backoff: Duration::from_secs(8),
            overall_timeout: Duration::from_secs(120),
        }
    }
}

impl RetryPolicy {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ExecutionError> {
        if self.max_attempts == 0 {
            return Err(ExecutionError::InvalidPolicy(
                "max_attempts cannot be 0".into(),
            ));
        }
        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(ExecutionError::InvalidPolicy(format!(
                "backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            )));
        }
        if self.initial_backoff > self.max_backoff {
            return Err(ExecutionError::InvalidPolicy(
                "initial_backoff cannot exceed max_backoff".into(),
            ));
        }
        if self.overall_timeout.is_zero() {
            return Err(ExecutionError::InvalidPolicy(
                "overall_timeout cannot be 0".into(),
            ));
        }
        if self.overall_timeout > MAX_POLICY_DURATION || self.max_backoff > MAX_POLICY_DURATION {
            return Err(ExecutionError::InvalidPolicy(format!(
                "overall_timeout and max_backoff cannot exceed {:?}",
                MAX_POLICY_DURATION
            )));
        }
        Ok(())
    }

    /// Wait after the `attempt`-th failed attempt (1-based):
    /// `min(initial * multiplier^(attempt - 1), max)`.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.initial_backoff.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        if !secs.is_finite() || secs >= self.max_backoff.as_secs_f64() {
            return self.max_backoff;
        }
        Duration::from_secs_f64(secs)
    }
}
