//! # Client
//!
//! Composition root. Owns one node pool, one id generator and one
//! execution engine, and hands out the operations callers need.
//!
//! ## Transaction Flow
//!
//! ```text
//! transaction_id() ──→ freeze_with_operator() ──→ execute() ──→ get_receipt()
//!        │                      │                     │               │
//!   id generator         body + freeze + sign     engine.submit   poller
//!                                                     └──── execute_and_wait() ────┘
//! ```

use lc_01_transaction_id::{SystemClock, TransactionIdGenerator, TransactionIdSource};
use lc_02_signing_envelope::{SigningEnvelope, TransactionBody};
use lc_03_node_pool::NodePool;
use lc_04_execution::{
    ExecutionEngine, NodeTransport, ReceiptPoller, RetryPolicy, TransactionResponse,
};
use lc_05_topic_subscription::{
    ConsensusTopicRunningHash, MirrorTransport, SubscriptionHandle, TopicQuery,
    TopicSubscriptionApi, TopicSubscriptionService,
};
use shared_crypto::SigningCapability;
use shared_types::{AccountId, TransactionId, TransactionReceipt, TransactionRecord};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::errors::ClientError;

/// Default payer: the account that pays for and signs transactions.
#[derive(Clone)]
pub struct Operator {
    pub account_id: AccountId,
    pub signer: Arc<dyn SigningCapability>,
}

/// Ledger client. Cheap to clone; clones share pool, engine and ids.
#[derive(Clone)]
pub struct Client {
    pool: Arc<NodePool>,
    ids: Arc<dyn TransactionIdSource>,
    engine: Arc<ExecutionEngine>,
    poller: ReceiptPoller,
    policy: RetryPolicy,
    operator: Option<Operator>,
    mirror: Option<TopicSubscriptionService>,
}

impl Client {
    /// Client over `pool` and `transport` with a system-clock id generator
    /// and the default retry policy.
    pub fn new(pool: Arc<NodePool>, transport: Arc<dyn NodeTransport>) -> Self {
        let engine = Arc::new(ExecutionEngine::new(pool.clone(), transport));
        Self {
            pool,
            ids: Arc::new(TransactionIdGenerator::system()),
            poller: ReceiptPoller::new(engine.clone()),
            engine,
            policy: RetryPolicy::default(),
            operator: None,
            mirror: None,
        }
    }

    /// Build from configuration.
    pub fn from_config(
        config: &ClientConfig,
        transport: Arc<dyn NodeTransport>,
    ) -> Result<Self, ClientError> {
        config.validate()?;

        let pool = Arc::new(config.build_pool()?);
        let mut client = Self::new(pool, transport)
            .with_retry_policy(config.retry)
            .with_id_source(Arc::new(TransactionIdGenerator::with_offset(
                SystemClock,
                config.valid_start_offset,
            )));

        if let Some(operator) = &config.operator {
            client = client.with_operator(operator.account_id, Arc::new(operator.key()?));
        }

        info!(
            nodes = client.pool.len(),
            operator = ?client.operator.as_ref().map(|op| op.account_id.to_string()),
            "Ledger client configured"
        );
        Ok(client)
    }

    pub fn with_operator(mut self, account_id: AccountId, signer: Arc<dyn SigningCapability>) -> Self {
        self.operator = Some(Operator { account_id, signer });
        self
    }

    pub fn with_mirror(mut self, transport: Arc<dyn MirrorTransport>) -> Self {
        self.mirror = Some(TopicSubscriptionService::new(transport));
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the transaction id source, for example with a manual clock.
    pub fn with_id_source(mut self, ids: Arc<dyn TransactionIdSource>) -> Self {
        self.ids = ids;
        self
    }

    pub fn pool(&self) -> &Arc<NodePool> {
        &self.pool
    }

    pub fn engine(&self) -> &Arc<ExecutionEngine> {
        &self.engine
    }

    pub fn operator(&self) -> Option<&Operator> {
        self.operator.as_ref()
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Next transaction id paid by the operator.
    pub fn transaction_id(&self) -> Result<TransactionId, ClientError> {
        let operator = self.operator.as_ref().ok_or(ClientError::NoOperator)?;
        Ok(self.ids.next(operator.account_id))
    }

    /// Next transaction id paid by `payer`.
    pub fn transaction_id_for(&self, payer: AccountId) -> TransactionId {
        self.ids.next(payer)
    }

    /// Build, freeze and operator-sign a transaction carrying `payload`.
    pub fn freeze_with_operator(
        &self,
        payload: Vec<u8>,
        memo: &str,
    ) -> Result<SigningEnvelope, ClientError> {
        let operator = self.operator.as_ref().ok_or(ClientError::NoOperator)?;
        let body =
            TransactionBody::new(self.ids.next(operator.account_id), payload).with_memo(memo);

        let mut envelope = SigningEnvelope::new(&body)?;
        envelope.freeze().sign(operator.signer.as_ref())?;
        debug!(tx = %envelope.transaction_id(), "Envelope frozen and signed");
        Ok(envelope)
    }

    /// Submit a frozen, signed envelope.
    pub async fn execute(
        &self,
        envelope: &SigningEnvelope,
    ) -> Result<TransactionResponse, ClientError> {
        Ok(self.engine.submit(envelope, &self.policy).await?)
    }

    pub async fn get_receipt(
        &self,
        transaction_id: TransactionId,
    ) -> Result<TransactionReceipt, ClientError> {
        Ok(self
            .poller
            .await_receipt(transaction_id, &self.policy)
            .await?)
    }

    pub async fn get_record(
        &self,
        transaction_id: TransactionId,
    ) -> Result<TransactionRecord, ClientError> {
        Ok(self
            .poller
            .await_record(transaction_id, &self.policy)
            .await?)
    }

    /// Submit, then poll the accepting node until the receipt is final.
    pub async fn execute_and_wait(
        &self,
        envelope: &SigningEnvelope,
    ) -> Result<TransactionReceipt, ClientError> {
        let response = self.execute(envelope).await?;
        info!(
            tx = %response.transaction_id,
            node = %response.node_account_id,
            "Transaction accepted, awaiting receipt"
        );
        Ok(self
            .poller
            .await_receipt_from(
                response.transaction_id,
                &[response.node_account_id],
                &self.policy,
            )
            .await?)
    }

    /// Validated subscription to a topic. Must be called inside a Tokio
    /// runtime.
    pub fn subscribe_topic(
        &self,
        query: TopicQuery,
        state: ConsensusTopicRunningHash,
    ) -> Result<SubscriptionHandle, ClientError> {
        let mirror = self.mirror.as_ref().ok_or(ClientError::NoMirror)?;
        Ok(mirror.subscribe(query, state)?)
    }

    /// Cancel every execution in flight and any started later.
    pub fn cancel_all(&self) {
        self.engine.cancellation().cancel();
    }
}
