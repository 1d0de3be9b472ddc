//! # Record Query
//!
//! Same polling rules as the receipt query, applied to the receipt embedded
//! in the record.

use async_trait::async_trait;
use lc_03_node_pool::NodeEndpoint;
use shared_types::{AccountId, TransactionId, TransactionRecord};

use super::receipt::classify_receipt;
use crate::domain::errors::ExecutionError;
use crate::domain::verdict::{classify_query_precheck, Verdict};
use crate::ports::inbound::{Executable, RequestKind};
use crate::ports::outbound::{NodeTransport, QueryAnswer, TransportError};

#[derive(Debug, Clone)]
pub struct RecordQuery {
    transaction_id: TransactionId,
    nodes: Vec<AccountId>,
}

impl RecordQuery {
    pub fn new(transaction_id: TransactionId) -> Self {
        Self {
            transaction_id,
            nodes: Vec::new(),
        }
    }

    pub fn with_nodes(mut self, nodes: Vec<AccountId>) -> Self {
        self.nodes = nodes;
        self
    }
}

#[async_trait]
impl Executable for RecordQuery {
    type Response = QueryAnswer<TransactionRecord>;
    type Output = TransactionRecord;

    fn kind(&self) -> RequestKind {
        RequestKind::Record
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
        transport.query_record(node, self.transaction_id).await
    }

    fn classify(&self, _node: &NodeEndpoint, answer: Self::Response) -> Verdict<TransactionRecord> {
        match classify_query_precheck(answer.precheck, self.transaction_id) {
            Verdict::Done(()) => {}
            Verdict::Retry(reason) => return Verdict::Retry(reason),
            Verdict::Fail(error) => return Verdict::Fail(error),
        }

        let Some(record) = answer.payload else {
            return Verdict::Fail(ExecutionError::MalformedResponse(format!(
                "record query for {} returned OK without a record",
                self.transaction_id
            )));
        };

        match classify_receipt(&record.receipt) {
            Verdict::Done(()) => Verdict::Done(record),
            Verdict::Retry(reason) => Verdict::Retry(reason),
            Verdict::Fail(error) => Verdict::Fail(error),
        }
    }
}
