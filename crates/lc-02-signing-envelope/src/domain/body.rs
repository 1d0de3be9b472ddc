//! # Transaction Body
//!
//! The signed part of a transaction. Its business payload is opaque bytes;
//! the envelope only cares about the id, routing and validity fields.

use serde::{Deserialize, Serialize};
use shared_types::{AccountId, TransactionId};

use super::errors::EnvelopeError;

/// How long after its valid start a transaction may reach consensus.
pub const DEFAULT_VALID_DURATION_SECS: u64 = 120;

/// Fee ceiling the payer is willing to pay, in the smallest unit (2 coins).
pub const DEFAULT_MAX_TRANSACTION_FEE: u64 = 200_000_000;

/// Network limit for the memo, in UTF-8 bytes.
pub const MAX_MEMO_BYTES: usize = 100;

/// Body of a transaction, serialized into the envelope's signed bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionBody {
    pub transaction_id: TransactionId,
    /// Node the transaction is addressed to; `None` lets any node accept it.
    pub node_account_id: Option<AccountId>,
    pub memo: String,
    pub valid_duration_secs: u64,
    pub max_transaction_fee: u64,
    /// Opaque business payload.
    pub payload: Vec<u8>,
}

impl TransactionBody {
    /// A body with default validity and fee and no memo.
    pub fn new(transaction_id: TransactionId, payload: Vec<u8>) -> Self {
        Self {
            transaction_id,
            node_account_id: None,
            memo: String::new(),
            valid_duration_secs: DEFAULT_VALID_DURATION_SECS,
            max_transaction_fee: DEFAULT_MAX_TRANSACTION_FEE,
            payload,
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    pub fn with_node(mut self, node_account_id: AccountId) -> Self {
        self.node_account_id = Some(node_account_id);
        self
    }

    /// Reject bodies the network would refuse at precheck.
    pub fn validate(&self) -> Result<(), EnvelopeError> {
        if self.memo.len() > MAX_MEMO_BYTES {
            return Err(EnvelopeError::MemoTooLong {
                len: self.memo.len(),
                max: MAX_MEMO_BYTES,
            });
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, EnvelopeError> {
        bincode::serialize(self).map_err(|e| EnvelopeError::Encoding(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        bincode::deserialize(bytes).map_err(|e| EnvelopeError::Decoding(e.to_string()))
    }
}
