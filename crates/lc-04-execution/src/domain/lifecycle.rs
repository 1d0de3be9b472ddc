//! # Transaction Lifecycle
//!
//! ```text
//! Built ──→ Frozen ──→ Signed ──→ Submitted ──→ Pending ──→ Succeeded
//!                                     │            │
//!                                     └────────────┴──→ Failed | TimedOut
//! ```
//!
//! `Pending` may repeat while receipts are polled. Terminal states accept
//! no further transitions.

use lc_02_signing_envelope::SigningEnvelope;
use std::fmt;

use super::errors::ExecutionError;

/// Where a transaction is on its way to consensus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionLifecycle {
    Built,
    Frozen,
    Signed,
    Submitted,
    Pending,
    Succeeded,
    Failed,
    TimedOut,
}

impl TransactionLifecycle {
    /// Stage reached by an envelope that has not been submitted yet.
    pub fn of_envelope(envelope: &SigningEnvelope) -> Self {
        match (envelope.is_frozen(), envelope.signatures().is_empty()) {
            (false, _) => TransactionLifecycle::Built,
            (true, true) => TransactionLifecycle::Frozen,
            (true, false) => TransactionLifecycle::Signed,
        }
    }

    /// Terminal stage for an execution error.
    pub fn of_error(error: &ExecutionError) -> Self {
        if error.is_timeout() {
            TransactionLifecycle::TimedOut
        } else {
            TransactionLifecycle::Failed
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionLifecycle::Succeeded
                | TransactionLifecycle::Failed
                | TransactionLifecycle::TimedOut
        )
    }

    pub fn can_transition_to(&self, next: TransactionLifecycle) -> bool {
        use TransactionLifecycle::*;
        matches!(
            (self, next),
            (Built, Frozen)
                | (Frozen, Signed)
                | (Signed, Signed)
                | (Signed, Submitted)
                | (Submitted, Pending)
                | (Pending, Pending)
                | (Pending, Succeeded)
                | (Signed | Submitted | Pending, Failed)
                | (Signed | Submitted | Pending, TimedOut)
        )
    }

    /// Move to `next`, returning the unchanged state when the move is illegal.
    pub fn advance(self, next: TransactionLifecycle) -> Result<Self, Self> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for TransactionLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionLifecycle::Built => "built",
            TransactionLifecycle::Frozen => "frozen",
            TransactionLifecycle::Signed => "signed",
            TransactionLifecycle::Submitted => "submitted",
            TransactionLifecycle::Pending => "pending",
            TransactionLifecycle::Succeeded => "succeeded",
            TransactionLifecycle::Failed => "failed",
            TransactionLifecycle::TimedOut => "timed-out",
        };
        f.write_str(name)
    }
}
