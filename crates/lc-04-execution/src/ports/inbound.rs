//! # Inbound Ports (Driving Ports / API)
//!
//! Anything the engine can run implements [`Executable`]: it knows how to
//! send itself to one node and how to read the answer.

use async_trait::async_trait;
use lc_03_node_pool::NodeEndpoint;
use shared_types::{AccountId, TransactionId};

use super::outbound::{NodeTransport, TransportError};
use crate::domain::verdict::Verdict;

/// Label for metrics and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Transaction,
    Receipt,
    Record,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Transaction => "transaction",
            RequestKind::Receipt => "receipt",
            RequestKind::Record => "record",
        }
    }
}

/// A request the execution engine can drive to completion.
#[async_trait]
pub trait Executable: Send + Sync {
    /// Raw node answer.
    type Response: Send;
    /// Value returned on success.
    type Output: Send;

    fn kind(&self) -> RequestKind;

    /// Transaction the request is about.
    fn transaction_id(&self) -> TransactionId;

    /// Explicit target nodes, tried round-robin by attempt. Empty means
    /// random selection from the pool.
    fn node_account_ids(&self) -> &[AccountId];

    /// Send one attempt to `node`.
    async fn send(
        &self,
        transport: &dyn NodeTransport,
        node: &NodeEndpoint,
    ) -> Result<Self::Response, TransportError>;

    /// Decide what the engine does with `response`.
    fn classify(&self, node: &NodeEndpoint, response: Self::Response) -> Verdict<Self::Output>;
}
