//! # Transaction Submission
//!
//! The envelope is serialized once; every attempt sends the same bytes, so
//! a retry on another node can never create a second transaction.

use async_trait::async_trait;
use lc_02_signing_envelope::SigningEnvelope;
use lc_03_node_pool::NodeEndpoint;
use shared_crypto::sha384;
use shared_types::{AccountId, Status, TransactionId};

use crate::domain::errors::ExecutionError;
use crate::domain::verdict::{classify_transaction_precheck, Verdict};
use crate::ports::inbound::{Executable, RequestKind};
use crate::ports::outbound::{NodeTransport, TransportError};

/// Acknowledgement that a node accepted a transaction for consensus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionResponse {
    pub transaction_id: TransactionId,
    /// Node that accepted the transaction; receipts are best asked there.
    pub node_account_id: AccountId,
    /// SHA-384 of the submitted bytes.
    pub transaction_hash: Vec<u8>,
}

/// A frozen, signed envelope ready to send.
#[derive(Debug, Clone)]
pub struct TransactionSubmission {
    transaction_id: TransactionId,
    bytes: Vec<u8>,
    nodes: Vec<AccountId>,
}

impl TransactionSubmission {
    /// Fails with [`ExecutionError::State`] unless the envelope is frozen and signed.
    pub fn new(envelope: &SigningEnvelope) -> Result<Self, ExecutionError> {
        envelope.ensure_executable()?;
        let bytes = envelope.to_wire()?;
        // A body addressed to one node is only valid there.
        let nodes = envelope.body().node_account_id.into_iter().collect();
        Ok(Self {
            transaction_id: envelope.transaction_id(),
            bytes,
            nodes,
        })
    }

    /// Restrict submission to these nodes, tried in order.
    pub fn with_nodes(mut self, nodes: Vec<AccountId>) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[async_trait]
impl Executable for TransactionSubmission {
    type Response = Status;
    type Output = TransactionResponse;

    fn kind(&self) -> RequestKind {
        RequestKind::Transaction
    }

    fn transaction_id(&self) -> TransactionId {
        self.transaction_id
    }

    fn node_account_ids(&self) -> &[AccountId] {
        &self.nodes
    }

    async fn send(
        &self,
        transport: &dyn NodeTransport,
        node: &NodeEndpoint,
    ) -> Result<Status, TransportError> {
        transport.submit_transaction(node, &self.bytes).await
    }

    fn classify(&self, node: &NodeEndpoint, status: Status) -> Verdict<TransactionResponse> {
        match classify_transaction_precheck(status, self.transaction_id) {
            Verdict::Done(()) => Verdict::Done(TransactionResponse {
                transaction_id: self.transaction_id,
                node_account_id: node.account_id(),
                transaction_hash: sha384(&self.bytes).to_vec(),
            }),
            Verdict::Retry(reason) => Verdict::Retry(reason),
            Verdict::Fail(error) => Verdict::Fail(error),
        }
    }
}
