//! Topic subscription query and reconnect policy.

use serde::{Deserialize, Serialize};
use shared_types::{Timestamp, TopicId};
use std::time::Duration;

use super::errors::SubscriptionError;

/// First reconnect delay; doubles per attempt up to `max_backoff`.
pub const BASE_RECONNECT_DELAY: Duration = Duration::from_millis(500);

/// What to stream from the mirror node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicQuery {
    pub topic_id: TopicId,
    /// Earliest consensus timestamp to deliver (inclusive).
    pub start_time: Option<Timestamp>,
    /// Stop before this consensus timestamp.
    pub end_time: Option<Timestamp>,
    /// Maximum number of messages; 0 streams without limit.
    #[serde(default)]
    pub limit: u64,
    /// Reconnects allowed before the subscription fails.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Ceiling for the reconnect delay.
    #[serde(default = "default_max_backoff", with = "humantime_serde")]
    pub max_backoff: Duration,
}

fn default_max_attempts() -> u32 {
    10
}

fn default_max_backoff() -> Duration {
    Duration::from_secs(8)
}

impl TopicQuery {
    pub fn new(topic_id: TopicId) -> Self {
        Self {
            topic_id,
            start_time: None,
            end_time: None,
            limit: 0,
            max_attempts: default_max_attempts(),
            max_backoff: default_max_backoff(),
        }
    }

    pub fn with_start_time(mut self, start: Timestamp) -> Self {
        self.start_time = Some(start);
        self
    }

    pub fn with_end_time(mut self, end: Timestamp) -> Self {
        self.end_time = Some(end);
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    /// Validate query
    pub fn validate(&self) -> Result<(), SubscriptionError> {
        if self.max_backoff < BASE_RECONNECT_DELAY {
            return Err(SubscriptionError::InvalidQuery(format!(
                "max_backoff must be at least {}ms",
                BASE_RECONNECT_DELAY.as_millis()
            )));
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if start >= end {
                return Err(SubscriptionError::InvalidQuery(format!(
                    "start_time {start} is not before end_time {end}"
                )));
            }
        }
        Ok(())
    }

    /// Whether `received` messages exhaust the limit.
    pub fn is_satisfied(&self, received: u64) -> bool {
        self.limit > 0 && received >= self.limit
    }

    /// Query that resumes after `received` messages, the last of which
    /// reached consensus at `last_timestamp`.
    pub fn resume_after(&self, last_timestamp: Timestamp, received: u64) -> Self {
        let mut resumed = self.clone();
        resumed.start_time = Some(last_timestamp.plus_nanos(1));
        if self.limit > 0 {
            resumed.limit = self.limit.saturating_sub(received);
        }
        resumed
    }

    /// Wait before reconnect number `attempt` (0-based):
    /// `min(500ms * 2^attempt, max_backoff)`.
    pub fn reconnect_delay(&self, attempt: u32) -> Duration {
        BASE_RECONNECT_DELAY
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_backoff)
    }
}
