//! # Execution Engine
//!
//! Drives an [`Executable`] across the node pool until it succeeds, fails
//! for good or runs out of budget.
//!
//! ## Attempt Loop
//!
//! 1. Pick a node: the request's explicit nodes round-robin, otherwise a
//!    random healthy node not excluded during this execution.
//! 2. Send, racing the overall deadline and the cancel token.
//! 3. Classify the answer:
//!    - done: return the output
//!    - transient precheck: exclude the node, back off, retry
//!    - pending: back off, retry (same pool)
//!    - failure: return it
//! 4. Retryable transport failures mark the node unhealthy and retry.
//!
//! Backoff sleeps never run past the deadline.

use lc_02_signing_envelope::SigningEnvelope;
use lc_03_node_pool::{NodeEndpoint, NodePool, PoolError};
use ledger_telemetry::{
    metric_inc, HistogramTimer, EXECUTION_DURATION, EXECUTION_TIMEOUTS, PRECHECK_FAILURES,
    PRECHECK_RETRIES, RECEIPT_POLLS, SUBMISSIONS,
};
use shared_types::{AccountId, Status};
use std::sync::Arc;
use tokio::time::{sleep_until, timeout_at, Instant};
use tracing::{debug, info, instrument, warn};

use crate::cancellation::CancellationToken;
use crate::domain::errors::{ExecutionError, TimeoutReason};
use crate::domain::policy::RetryPolicy;
use crate::domain::verdict::Verdict;
use crate::ports::inbound::Executable;
use crate::ports::outbound::NodeTransport;
use crate::requests::{TransactionResponse, TransactionSubmission};

/// Multi-node executor with retry and backoff.
pub struct ExecutionEngine {
    pool: Arc<NodePool>,
    transport: Arc<dyn NodeTransport>,
    cancel: CancellationToken,
}

impl ExecutionEngine {
    pub fn new(pool: Arc<NodePool>, transport: Arc<dyn NodeTransport>) -> Self {
        Self {
            pool,
            transport,
            cancel: CancellationToken::new(),
        }
    }

    /// Share a cancel token with other components (for example a client).
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn pool(&self) -> &Arc<NodePool> {
        &self.pool
    }

    pub fn transport(&self) -> &Arc<dyn NodeTransport> {
        &self.transport
    }

    /// Token that cancels every execution started by this engine.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Submit a frozen, signed envelope.
    pub async fn submit(
        &self,
        envelope: &SigningEnvelope,
        policy: &RetryPolicy,
    ) -> Result<TransactionResponse, ExecutionError> {
        let submission = TransactionSubmission::new(envelope)?;
        self.execute(&submission, policy).await
    }

    /// Run `request` under `policy`, observing the engine's cancel token.
    pub async fn execute<R: Executable>(
        &self,
        request: &R,
        policy: &RetryPolicy,
    ) -> Result<R::Output, ExecutionError> {
        self.execute_with_cancel(request, policy, &self.cancel).await
    }

    /// Run `request` under `policy`, observing `cancel` instead of the
    /// engine's own token.
    #[instrument(
        skip_all,
        fields(kind = request.kind().as_str(), tx = %request.transaction_id())
    )]
    pub async fn execute_with_cancel<R: Executable>(
        &self,
        request: &R,
        policy: &RetryPolicy,
        cancel: &CancellationToken,
    ) -> Result<R::Output, ExecutionError> {
        policy.validate()?;
        let _timer = HistogramTimer::new(&EXECUTION_DURATION);

        let deadline = Instant::now() + policy.overall_timeout;
        let mut excluded: Vec<AccountId> = Vec::new();
        let mut last_status: Option<Status> = None;

        for attempt in 1..=policy.max_attempts {
            if cancel.is_cancelled() {
                return Err(ExecutionError::Cancelled);
            }

            let node = self.select_node(request, attempt, &mut excluded)?;
            metric_inc!(SUBMISSIONS, &[request.kind().as_str()]);
            debug!(attempt, node = %node.account_id(), "Sending request");

            let sent = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ExecutionError::Cancelled),
                sent = timeout_at(deadline, request.send(self.transport.as_ref(), node)) => sent,
            };
            let Ok(outcome) = sent else {
                return Err(self.timed_out(TimeoutReason::Deadline, attempt, last_status));
            };

            match outcome {
                Ok(response) => {
                    self.pool.mark_healthy(node.account_id())?;
                    match request.classify(node, response) {
                        Verdict::Done(output) => {
                            info!(attempt, node = %node.account_id(), "Request completed");
                            return Ok(output);
                        }
                        Verdict::Retry(reason) => {
                            let status = reason.status();
                            last_status = Some(status);
                            if reason.excludes_node() {
                                metric_inc!(PRECHECK_RETRIES, &[status.name()]);
                                excluded.push(node.account_id());
                            } else {
                                metric_inc!(RECEIPT_POLLS);
                            }
                            debug!(attempt, node = %node.account_id(), %status, "Retrying");
                        }
                        Verdict::Fail(error) => {
                            if let ExecutionError::Precheck { status, .. } = &error {
                                metric_inc!(PRECHECK_FAILURES, &[status.name()]);
                            }
                            warn!(attempt, node = %node.account_id(), error = %error, "Request failed");
                            return Err(error);
                        }
                    }
                }
                Err(error) if error.is_retryable() => {
                    warn!(attempt, node = %node.account_id(), error = %error, "Node unreachable, marking unhealthy");
                    self.pool.mark_unhealthy(node.account_id())?;
                }
                Err(source) => {
                    return Err(ExecutionError::Transport {
                        node: node.account_id(),
                        source,
                    });
                }
            }

            if attempt == policy.max_attempts {
                break;
            }

            let wake = (Instant::now() + policy.backoff_for(attempt)).min(deadline);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ExecutionError::Cancelled),
                _ = sleep_until(wake) => {}
            }
            if Instant::now() >= deadline {
                return Err(self.timed_out(TimeoutReason::Deadline, attempt, last_status));
            }
        }

        Err(self.timed_out(
            TimeoutReason::MaxAttempts,
            policy.max_attempts,
            last_status,
        ))
    }

    fn select_node<R: Executable>(
        &self,
        request: &R,
        attempt: u32,
        excluded: &mut Vec<AccountId>,
    ) -> Result<&NodeEndpoint, ExecutionError> {
        let explicit = request.node_account_ids();
        if !explicit.is_empty() {
            let account = explicit[(attempt as usize - 1) % explicit.len()];
            return self
                .pool
                .by_account(account)
                .ok_or(ExecutionError::Pool(PoolError::UnknownNode(account)));
        }

        match self.pool.random_excluding(excluded) {
            Err(PoolError::AllExcluded(count)) => {
                // Every node said BUSY once; start another round.
                debug!(count, "All nodes excluded, resetting exclusions");
                excluded.clear();
                Ok(self.pool.random()?)
            }
            selected => Ok(selected?),
        }
    }

    fn timed_out(
        &self,
        reason: TimeoutReason,
        attempts: u32,
        last_status: Option<Status>,
    ) -> ExecutionError {
        metric_inc!(EXECUTION_TIMEOUTS);
        warn!(%reason, attempts, ?last_status, "Execution timed out");
        ExecutionError::Timeout {
            reason,
            attempts,
            last_status,
        }
    }
}
