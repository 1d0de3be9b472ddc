//! # Inbound Ports (Driving Ports / API)

use shared_types::{AccountId, TransactionId};

/// Source of fresh transaction ids.
pub trait TransactionIdSource: Send + Sync {
    /// Issue the next id for `payer`.
    ///
    /// Never returns an id equal to or earlier than a previous one for the
    /// same payer from this source.
    fn next(&self, payer: AccountId) -> TransactionId;
}
