//! # Node Pool Subsystem (LC-03)
//!
//! The set of network nodes a client may submit to, with random selection
//! and per-node health backoff.
//!
//! ## Node Health
//!
//! ```text
//!   healthy ──transport failure──→ unhealthy until readmit_at
//!      ▲                                  │
//!      └────────── readmit_at passes ─────┘
//!
//!   failure: readmit_at = now + backoff; backoff = min(backoff * 2, max)
//!   success: backoff = max(backoff / 2, min)
//! ```
//!
//! Unhealthy nodes are skipped by random selection unless every node is
//! unhealthy, in which case selection falls back to the whole pool.

pub mod domain;

pub use domain::config::{NodeHealthConfig, MAX_NODE_BACKOFF};
pub use domain::endpoint::NodeEndpoint;
pub use domain::errors::PoolError;
pub use domain::health::NodeHealth;
pub use domain::pool::NodePool;
