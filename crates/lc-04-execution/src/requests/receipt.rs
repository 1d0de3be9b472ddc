//! # Receipt Query
//!
//! Polls until the receipt leaves the pending set. `SUCCESS` returns the
//! receipt; any other terminal status becomes [`ExecutionError::ReceiptStatus`].

use async_trait::async_trait;
use lc_03_node_pool::NodeEndpoint;
use shared_types::{AccountId, TransactionId, TransactionReceipt};

use crate::domain::errors::ExecutionError;
use crate::domain::verdict::{classify_query_precheck, RetryReason, Verdict};
use crate::ports::inbound::{Executable, RequestKind};
use crate::ports::outbound::{NodeTransport, QueryAnswer, TransportError};

#[derive(Debug, Clone)]
pub struct ReceiptQuery {
    transaction_id: TransactionId,
    nodes: Vec<AccountId>,
}

impl ReceiptQuery {
    pub fn new(transaction_id: TransactionId) -> Self {
        Self {
            transaction_id,
            nodes: Vec::new(),
        }
    }

    /// Ask only these nodes, round-robin.
    pub fn with_nodes(mut self, nodes: Vec<AccountId>) -> Self {
        self.nodes = nodes;
        self
    }
}

/// Shared receipt-status check for receipt and record queries.
pub(crate) fn classify_receipt(receipt: &TransactionReceipt) -> Verdict<()> {
    if receipt.status.is_success() {
        Verdict::Done(())
    } else if receipt.status.is_receipt_pending() {
        Verdict::Retry(RetryReason::Pending(receipt.status))
    } else {
        Verdict::Fail(ExecutionError::ReceiptStatus {
            receipt: receipt.clone(),
        })
    }
}

#[async_trait]
impl Executable for ReceiptQuery {
    type Response = QueryAnswer<TransactionReceipt>;
    type Output = TransactionReceipt;

    fn kind(&self) -> RequestKind {
        RequestKind::Receipt
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
    ) -> Result<Self::Response, TransportError> {
        transport.query_receipt(node, self.transaction_id).await
    }

    fn classify(
        &self,
        _node: &NodeEndpoint,
        answer: Self::Response,
    ) -> Verdict<TransactionReceipt> {
        match classify_query_precheck(answer.precheck, self.transaction_id) {
            Verdict::Done(()) => {}
            Verdict::Retry(reason) => return Verdict::Retry(reason),
            Verdict::Fail(error) => return Verdict::Fail(error),
        }

        let Some(receipt) = answer.payload else {
            return Verdict::Fail(ExecutionError::MalformedResponse(format!(
                "receipt query for {} returned OK without a receipt",
                self.transaction_id
            )));
        };

        match classify_receipt(&receipt) {
            Verdict::Done(()) => Verdict::Done(receipt),
            Verdict::Retry(reason) => Verdict::Retry(reason),
            Verdict::Fail(error) => Verdict::Fail(error),
        }
    }
}
