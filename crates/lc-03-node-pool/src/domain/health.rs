//! # Per-Node Health
//!
//! Exponential readmission backoff. A failing node is kept out of random
//! selection until its readmit time; each further failure doubles the next
//! backoff and each success halves it.

use std::time::{Duration, Instant};

use super::config::NodeHealthConfig;

/// Health record of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeHealth {
    backoff: Duration,
    readmit_at: Option<Instant>,
    failures: u32,
}

impl NodeHealth {
    pub fn new(config: &NodeHealthConfig) -> Self {
        Self {
            backoff: config.min_backoff,
            readmit_at: None,
            failures: 0,
        }
    }

    /// Backoff applied on the next failure.
    pub fn current_backoff(&self) -> Duration {
        self.backoff
    }

    pub fn readmit_at(&self) -> Option<Instant> {
        self.readmit_at
    }

    /// Failures recorded so far.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn is_healthy_at(&self, now: Instant) -> bool {
        self.readmit_at.map_or(true, |readmit| readmit <= now)
    }

    pub fn record_failure(&mut self, config: &NodeHealthConfig, now: Instant) {
        self.failures = self.failures.saturating_add(1);
        self.readmit_at = Some(now + self.backoff);
        self.backoff = self.backoff.saturating_mul(2).min(config.max_backoff);
    }

    pub fn record_success(&mut self, config: &NodeHealthConfig) {
        self.backoff = (self.backoff / 2).max(config.min_backoff);
    }
}
