//! # Outbound Ports (Driven Ports / SPI)
//!
//! How the engine reaches a node. Payloads cross this boundary as opaque
//! bytes or typed ledger values; the wire protocol belongs to the adapter.

use async_trait::async_trait;
use lc_03_node_pool::NodeEndpoint;
use shared_types::{Status, TransactionId, TransactionReceipt, TransactionRecord};
use thiserror::Error;

/// Failure to exchange a message with a node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The node could not be reached.
    #[error("Node unavailable: {0}")]
    Unavailable(String),

    /// The node shed load at the transport level.
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Any other transport failure.
    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Whether retrying on another node may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransportError::Unavailable(_) | TransportError::ResourceExhausted(_)
        )
    }
}

/// Answer to a query: the precheck plus, when it passed, the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryAnswer<T> {
    pub precheck: Status,
    pub payload: Option<T>,
}

impl<T> QueryAnswer<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            precheck: Status::Ok,
            payload: Some(payload),
        }
    }

    pub fn rejected(precheck: Status) -> Self {
        Self {
            precheck,
            payload: None,
        }
    }
}

/// Transport to the consensus nodes.
#[async_trait]
pub trait NodeTransport: Send + Sync {
    /// Submit serialized envelope bytes; returns the precheck status.
    async fn submit_transaction(
        &self,
        node: &NodeEndpoint,
        envelope_bytes: &[u8],
    ) -> Result<Status, TransportError>;

    /// Ask a node for a transaction receipt.
    async fn query_receipt(
        &self,
        node: &NodeEndpoint,
        transaction_id: TransactionId,
    ) -> Result<QueryAnswer<TransactionReceipt>, TransportError>;

    /// Ask a node for a transaction record.
    async fn query_record(
        &self,
        node: &NodeEndpoint,
        transaction_id: TransactionId,
    ) -> Result<QueryAnswer<TransactionRecord>, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_transport_errors() {
        assert!(TransportError::Unavailable("down".into()).is_retryable());
        assert!(TransportError::ResourceExhausted("slow down".into()).is_retryable());
        assert!(!TransportError::Other("tls".into()).is_retryable());
    }
}
