//! # Receipts and Records
//!
//! What the network reports once a transaction reaches consensus. A receipt
//! is the compact outcome; a record adds the consensus timestamp, the
//! transaction hash and the charged fee.

use serde::{Deserialize, Serialize};

use crate::entities::{AccountId, ContractId, EntityId, FileId, TopicId};
use crate::status::Status;
use crate::timestamp::Timestamp;
use crate::transaction_id::TransactionId;

/// Outcome of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    /// The transaction this receipt is for.
    pub transaction_id: TransactionId,
    /// Consensus status; `SUCCESS` when applied.
    pub status: Status,
    /// Account created by the transaction, if any.
    pub account_id: Option<AccountId>,
    /// File created by the transaction, if any.
    pub file_id: Option<FileId>,
    /// Contract created by the transaction, if any.
    pub contract_id: Option<ContractId>,
    /// Topic created by the transaction, if any.
    pub topic_id: Option<TopicId>,
    /// Topic sequence number after a topic message submission.
    pub topic_sequence_number: Option<u64>,
    /// Topic running hash after a topic message submission.
    pub topic_running_hash: Option<Vec<u8>>,
}

impl TransactionReceipt {
    /// A receipt carrying only a status.
    pub fn with_status(transaction_id: TransactionId, status: Status) -> Self {
        Self {
            transaction_id,
            status,
            account_id: None,
            file_id: None,
            contract_id: None,
            topic_id: None,
            topic_sequence_number: None,
            topic_running_hash: None,
        }
    }

    /// Id of whichever entity the transaction created.
    pub fn created_entity_id(&self) -> Option<EntityId> {
        self.account_id
            .map(|id| id.entity())
            .or_else(|| self.file_id.map(|id| id.entity()))
            .or_else(|| self.contract_id.map(|id| id.entity()))
            .or_else(|| self.topic_id.map(|id| id.entity()))
    }
}

/// Full consensus record of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub receipt: TransactionReceipt,
    pub consensus_timestamp: Timestamp,
    /// SHA-384 of the submitted transaction bytes.
    pub transaction_hash: Vec<u8>,
    pub memo: String,
    /// Fee charged, in the smallest currency unit.
    pub transaction_fee: u64,
}
