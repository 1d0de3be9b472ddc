//! Node health configuration with validation.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::errors::PoolError;

/// Upper bound for `max_backoff`.
pub const MAX_NODE_BACKOFF: Duration = Duration::from_secs(24 * 60 * 60);

/// Bounds for per-node readmission backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeHealthConfig {
    /// Backoff after the first failure, and the floor when recovering
    #[serde(with = "humantime_serde")]
    pub min_backoff: Duration,
    /// Backoff ceiling
    #[serde(with = "humantime_serde")]
    pub max_backoff: Duration,
}

impl Default for NodeHealthConfig {
    fn default() -> Self {
        Self {
            min_backoff: Duration::from_secs(8),
            max_backoff: Duration::from_secs(60 * 60),
        }
    }
}

impl NodeHealthConfig {
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.min_backoff.is_zero() {
            return Err(PoolError::InvalidConfig("min_backoff cannot be 0".into()));
        }
        if self.min_backoff > self.max_backoff {
            return Err(PoolError::InvalidConfig(
                "min_backoff cannot exceed max_backoff".into(),
            ));
        }
        if self.max_backoff > MAX_NODE_BACKOFF {
            return Err(PoolError::InvalidConfig(format!(
                "max_backoff cannot exceed {:?}",
                MAX_NODE_BACKOFF
            )));
        }
        Ok(())
    }
}
