//! # Error Types
//!
//! Errors raised while parsing or decoding shared ledger types.

use thiserror::Error;

/// Errors produced when parsing text or wire forms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Not a `shard.realm.num` triple of non-negative integers.
    #[error("Invalid entity id: {0:?}")]
    InvalidEntityId(String),

    /// Not a `seconds.nanos` timestamp.
    #[error("Invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    /// Not a `payer@seconds.nanos` transaction id.
    #[error("Invalid transaction id: {0:?}")]
    InvalidTransactionId(String),

    /// Not a `host:port` node address.
    #[error("Invalid node address: {0:?}")]
    InvalidAddress(String),

    /// Binary wire form could not be decoded.
    #[error("Wire decode failed: {0}")]
    Wire(String),
}
