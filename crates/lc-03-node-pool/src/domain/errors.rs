//! # Pool Errors

use shared_types::{AccountId, ParseError};
use thiserror::Error;

/// Errors from pool construction and node selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The pool has no nodes at all.
    #[error("Node pool is empty")]
    Empty,

    /// Two endpoints share the same node account.
    #[error("Duplicate node account: {0}")]
    DuplicateAccount(AccountId),

    /// No node with this account is in the pool.
    #[error("Unknown node: {0}")]
    UnknownNode(AccountId),

    /// Every node is in the exclusion list.
    #[error("All {0} nodes excluded")]
    AllExcluded(usize),

    /// An endpoint address could not be parsed.
    #[error("Invalid endpoint: {0}")]
    Parse(#[from] ParseError),

    /// Health configuration is inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
