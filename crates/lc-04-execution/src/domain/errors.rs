//! # Execution Errors
//!
//! Transient conditions (busy nodes, pending receipts, flaky transports)
//! never surface here unless the retry budget runs out.

use lc_02_signing_envelope::EnvelopeError;
use lc_03_node_pool::PoolError;
use shared_types::{AccountId, Status, TransactionId, TransactionReceipt};
use std::fmt;
use thiserror::Error;

use crate::ports::outbound::TransportError;

/// Which budget ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutReason {
    /// `max_attempts` attempts were made.
    MaxAttempts,
    /// `overall_timeout` elapsed.
    Deadline,
}

impl fmt::Display for TimeoutReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeoutReason::MaxAttempts => write!(f, "max attempts reached"),
            TimeoutReason::Deadline => write!(f, "deadline exceeded"),
        }
    }
}

/// Errors returned by the execution engine and receipt poller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutionError {
    /// The retry policy is inconsistent.
    #[error("Invalid retry policy: {0}")]
    InvalidPolicy(String),

    /// The envelope is not ready for submission.
    #[error("Envelope not executable: {0}")]
    State(#[from] EnvelopeError),

    /// A node rejected the request before consensus.
    #[error("Precheck failed with {status} for transaction {transaction_id}")]
    Precheck {
        status: Status,
        transaction_id: TransactionId,
    },

    /// Consensus was reached but the transaction did not succeed.
    #[error("Receipt for transaction {} reports {}", .receipt.transaction_id, .receipt.status)]
    ReceiptStatus { receipt: TransactionReceipt },

    /// The retry budget ran out.
    #[error("Timed out ({reason}) after {attempts} attempts; last status {last_status:?}")]
    Timeout {
        reason: TimeoutReason,
        attempts: u32,
        last_status: Option<Status>,
    },

    /// The caller cancelled the execution.
    #[error("Execution cancelled")]
    Cancelled,

    /// A non-retryable transport failure.
    #[error("Transport failure talking to node {node}: {source}")]
    Transport {
        node: AccountId,
        #[source]
        source: TransportError,
    },

    /// Node selection failed.
    #[error("Node pool: {0}")]
    Pool(#[from] PoolError),

    /// A node answered OK but left out the expected payload.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ExecutionError {
    /// Whether the error came from running out of attempts or time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ExecutionError::Timeout { .. })
    }

    /// Status carried by the error, if any.
    pub fn status(&self) -> Option<Status> {
        match self {
            ExecutionError::Precheck { status, .. } => Some(*status),
            ExecutionError::ReceiptStatus { receipt } => Some(receipt.status),
            ExecutionError::Timeout { last_status, .. } => *last_status,
            _ => None,
        }
    }
}
