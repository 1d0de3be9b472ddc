//! # Scripted Transport
//!
//! A [`NodeTransport`] that replays canned answers. Used by tests and by
//! offline tooling that needs a network without a network.
//!
//! Answers are queued per node (submissions) or per transaction
//! (receipts, records). The last queued answer repeats once a queue is
//! down to one entry, so "always BUSY" is a one-element script.

use async_trait::async_trait;
use lc_03_node_pool::NodeEndpoint;
use parking_lot::Mutex;
use shared_types::{AccountId, Status, TransactionId, TransactionReceipt, TransactionRecord};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::ports::inbound::RequestKind;
use crate::ports::outbound::{NodeTransport, QueryAnswer, TransportError};

type Answer<T> = Result<T, TransportError>;

/// One call observed by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedCall {
    pub kind: RequestKind,
    pub node: AccountId,
}

#[derive(Default)]
struct Scripts {
    submissions: HashMap<AccountId, VecDeque<Answer<Status>>>,
    any_node_submissions: VecDeque<Answer<Status>>,
    receipts: HashMap<TransactionId, VecDeque<Answer<QueryAnswer<TransactionReceipt>>>>,
    records: HashMap<TransactionId, VecDeque<Answer<QueryAnswer<TransactionRecord>>>>,
    calls: Vec<ScriptedCall>,
    submitted: Vec<Vec<u8>>,
}

/// Replays scripted node answers.
#[derive(Default)]
pub struct ScriptedTransport {
    scripts: Mutex<Scripts>,
    latency: Mutex<Duration>,
}

/// Pop the next answer, keeping the last one in place.
fn next_answer<T: Clone>(queue: &mut VecDeque<T>) -> Option<T> {
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every answer by `latency`.
    pub fn with_latency(self, latency: Duration) -> Self {
        *self.latency.lock() = latency;
        self
    }

    /// Precheck answers for submissions to `node`.
    pub fn script_node(&self, node: AccountId, answers: impl IntoIterator<Item = Answer<Status>>) {
        self.scripts
            .lock()
            .submissions
            .entry(node)
            .or_default()
            .extend(answers);
    }

    /// Precheck answers for submissions to nodes without their own script.
    /// Unscripted submissions are accepted with `OK`.
    pub fn script_submissions(&self, answers: impl IntoIterator<Item = Answer<Status>>) {
        self.scripts.lock().any_node_submissions.extend(answers);
    }

    /// Receipt answers for `transaction_id`. Unscripted queries get
    /// `RECEIPT_NOT_FOUND`.
    pub fn script_receipts(
        &self,
        transaction_id: TransactionId,
        answers: impl IntoIterator<Item = Answer<QueryAnswer<TransactionReceipt>>>,
    ) {
        self.scripts
            .lock()
            .receipts
            .entry(transaction_id)
            .or_default()
            .extend(answers);
    }

    /// Record answers for `transaction_id`. Unscripted queries get
    /// `RECORD_NOT_FOUND`.
    pub fn script_records(
        &self,
        transaction_id: TransactionId,
        answers: impl IntoIterator<Item = Answer<QueryAnswer<TransactionRecord>>>,
    ) {
        self.scripts
            .lock()
            .records
            .entry(transaction_id)
            .or_default()
            .extend(answers);
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<ScriptedCall> {
        self.scripts.lock().calls.clone()
    }

    /// Nodes contacted for `kind`, in order.
    pub fn nodes_called(&self, kind: RequestKind) -> Vec<AccountId> {
        self.scripts
            .lock()
            .calls
            .iter()
            .filter(|call| call.kind == kind)
            .map(|call| call.node)
            .collect()
    }

    /// Raw bytes of every submission.
    pub fn submitted_bytes(&self) -> Vec<Vec<u8>> {
        self.scripts.lock().submitted.clone()
    }

    async fn delay(&self) {
        let latency = *self.latency.lock();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl NodeTransport for ScriptedTransport {
    async fn submit_transaction(
        &self,
        node: &NodeEndpoint,
        envelope_bytes: &[u8],
    ) -> Result<Status, TransportError> {
        let answer = {
            let mut scripts = self.scripts.lock();
            scripts.calls.push(ScriptedCall {
                kind: RequestKind::Transaction,
                node: node.account_id(),
            });
            scripts.submitted.push(envelope_bytes.to_vec());
            let own = scripts
                .submissions
                .get_mut(&node.account_id())
                .and_then(next_answer);
            own.or_else(|| next_answer(&mut scripts.any_node_submissions))
                .unwrap_or(Ok(Status::Ok))
        };
        self.delay().await;
        answer
    }

    async fn query_receipt(
        &self,
        node: &NodeEndpoint,
        transaction_id: TransactionId,
    ) -> Result<QueryAnswer<TransactionReceipt>, TransportError> {
        let answer = {
            let mut scripts = self.scripts.lock();
            scripts.calls.push(ScriptedCall {
                kind: RequestKind::Receipt,
                node: node.account_id(),
            });
            scripts
                .receipts
                .get_mut(&transaction_id)
                .and_then(next_answer)
                .unwrap_or(Ok(QueryAnswer::rejected(Status::ReceiptNotFound)))
        };
        self.delay().await;
        answer
    }

    async fn query_record(
        &self,
        node: &NodeEndpoint,
        transaction_id: TransactionId,
    ) -> Result<QueryAnswer<TransactionRecord>, TransportError> {
        let answer = {
            let mut scripts = self.scripts.lock();
            scripts.calls.push(ScriptedCall {
                kind: RequestKind::Record,
                node: node.account_id(),
            });
            scripts
                .records
                .get_mut(&transaction_id)
                .and_then(next_answer)
                .unwrap_or(Ok(QueryAnswer::rejected(Status::RecordNotFound)))
        };
        self.delay().await;
        answer
    }
}
