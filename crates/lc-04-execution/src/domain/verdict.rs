//! # Response Classification
//!
//! Every node answer is folded into a [`Verdict`] that tells the engine
//! whether to return, retry or give up.

use shared_types::{Status, TransactionId};

use super::errors::ExecutionError;

/// Why an attempt is being retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryReason {
    /// The node is overloaded or not ready; try another node.
    TransientPrecheck(Status),
    /// The answer is not available yet; ask again later.
    Pending(Status),
}

impl RetryReason {
    pub fn status(&self) -> Status {
        match self {
            RetryReason::TransientPrecheck(status) | RetryReason::Pending(status) => *status,
        }
    }

    /// Whether the answering node should be skipped for the rest of this execution.
    pub fn excludes_node(&self) -> bool {
        matches!(self, RetryReason::TransientPrecheck(_))
    }
}

/// Outcome of classifying one node answer.
#[derive(Debug)]
pub enum Verdict<T> {
    Done(T),
    Retry(RetryReason),
    Fail(ExecutionError),
}

/// Classify a transaction precheck: `OK` passes, transient codes retry,
/// anything else is a precheck failure.
pub fn classify_transaction_precheck(
    status: Status,
    transaction_id: TransactionId,
) -> Verdict<()> {
    if status == Status::Ok {
        Verdict::Done(())
    } else if status.is_transient_precheck() {
        Verdict::Retry(RetryReason::TransientPrecheck(status))
    } else {
        Verdict::Fail(ExecutionError::Precheck {
            status,
            transaction_id,
        })
    }
}

/// Classify the precheck of a receipt or record query.
pub fn classify_query_precheck(status: Status, transaction_id: TransactionId) -> Verdict<()> {
    if status == Status::Ok {
        Verdict::Done(())
    } else if status.is_transient_precheck() {
        Verdict::Retry(RetryReason::TransientPrecheck(status))
    } else if status.is_query_precheck_retryable() {
        Verdict::Retry(RetryReason::Pending(status))
    } else {
        Verdict::Fail(ExecutionError::Precheck {
            status,
            transaction_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{AccountId, Timestamp};

    fn id() -> TransactionId {
        TransactionId::new(AccountId::new(0, 0, 2), Timestamp::new(1, 0))
    }

    #[test]
    fn test_transaction_precheck() {
        assert!(matches!(
            classify_transaction_precheck(Status::Ok, id()),
            Verdict::Done(())
        ));
        assert!(matches!(
            classify_transaction_precheck(Status::Busy, id()),
            Verdict::Retry(RetryReason::TransientPrecheck(Status::Busy))
        ));
        assert!(matches!(
            classify_transaction_precheck(Status::PlatformTransactionNotCreated, id()),
            Verdict::Retry(_)
        ));
        assert!(matches!(
            classify_transaction_precheck(Status::InsufficientPayerBalance, id()),
            Verdict::Fail(ExecutionError::Precheck {
                status: Status::InsufficientPayerBalance,
                ..
            })
        ));
    }

    #[test]
    fn test_query_precheck() {
        assert!(matches!(
            classify_query_precheck(Status::ReceiptNotFound, id()),
            Verdict::Retry(RetryReason::Pending(Status::ReceiptNotFound))
        ));
        assert!(matches!(
            classify_query_precheck(Status::Unknown, id()),
            Verdict::Retry(RetryReason::Pending(Status::Unknown))
        ));
        assert!(matches!(
            classify_query_precheck(Status::Busy, id()),
            Verdict::Retry(RetryReason::TransientPrecheck(Status::Busy))
        ));
        assert!(matches!(
            classify_query_precheck(Status::InvalidTransactionId, id()),
            Verdict::Fail(_)
        ));
    }

    #[test]
    fn test_only_transient_excludes_node() {
        assert!(RetryReason::TransientPrecheck(Status::Busy).excludes_node());
        assert!(!RetryReason::Pending(Status::Unknown).excludes_node());
    }
}
