//! # Receipt Poller
//!
//! Waits for consensus by polling receipt or record queries through the
//! execution engine. Pending answers back off under the same
//! [`RetryPolicy`] as submissions.

use shared_types::{AccountId, TransactionId, TransactionReceipt, TransactionRecord};
use std::sync::Arc;
use tracing::debug;

use crate::domain::errors::ExecutionError;
use crate::domain::policy::RetryPolicy;
use crate::requests::{ReceiptQuery, RecordQuery};
use crate::service::ExecutionEngine;

/// Polls for receipts and records. Cheap to clone.
#[derive(Clone)]
pub struct ReceiptPoller {
    engine: Arc<ExecutionEngine>,
}

impl ReceiptPoller {
    pub fn new(engine: Arc<ExecutionEngine>) -> Self {
        Self { engine }
    }

    /// Poll any node until the receipt is final.
    pub async fn await_receipt(
        &self,
        transaction_id: TransactionId,
        policy: &RetryPolicy,
    ) -> Result<TransactionReceipt, ExecutionError> {
        self.await_receipt_from(transaction_id, &[], policy).await
    }

    /// Poll only `nodes` (round-robin). An empty slice means any node.
    pub async fn await_receipt_from(
        &self,
        transaction_id: TransactionId,
        nodes: &[AccountId],
        policy: &RetryPolicy,
    ) -> Result<TransactionReceipt, ExecutionError> {
        debug!(tx = %transaction_id, "Awaiting receipt");
        let query = ReceiptQuery::new(transaction_id).with_nodes(nodes.to_vec());
        self.engine.execute(&query, policy).await
    }

    /// Poll any node until the record is available and its receipt is final.
    pub async fn await_record(
        &self,
        transaction_id: TransactionId,
        policy: &RetryPolicy,
    ) -> Result<TransactionRecord, ExecutionError> {
        debug!(tx = %transaction_id, "Awaiting record");
        self.engine
            .execute(&RecordQuery::new(transaction_id), policy)
            .await
    }
}
