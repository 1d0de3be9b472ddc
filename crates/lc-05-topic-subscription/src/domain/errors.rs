//! Topic and subscription errors.

use shared_types::{Timestamp, TopicId};
use thiserror::Error;

use crate::ports::outbound::MirrorError;

/// The running-hash chain or the sequence numbering broke.
///
/// Always fatal for the current state: recover by resubscribing from a
/// known-good point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopicIntegrityError {
    /// A message was dropped, duplicated or reordered.
    #[error("Topic {topic_id}: expected sequence number {expected}, got {actual}")]
    SequenceMismatch {
        topic_id: TopicId,
        expected: u64,
        actual: u64,
    },

    /// The message or its metadata was altered.
    #[error(
        "Topic {topic_id}: running hash mismatch at sequence {sequence_number} \
         (consensus {consensus_timestamp}): expected {expected}, got {actual}"
    )]
    HashMismatch {
        topic_id: TopicId,
        sequence_number: u64,
        consensus_timestamp: Timestamp,
        /// Hex of the recomputed hash.
        expected: String,
        /// Hex of the hash reported by the mirror.
        actual: String,
    },
}

/// Errors delivered to, or returned while creating, a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    /// The query cannot be run.
    #[error("Invalid topic query: {0}")]
    InvalidQuery(String),

    /// The query is for a different topic than the running-hash state.
    #[error("Query topic {query} does not match running-hash topic {state}")]
    TopicMismatch { query: TopicId, state: TopicId },

    /// The stream failed validation; the subscription has ended.
    #[error(transparent)]
    Integrity(#[from] TopicIntegrityError),

    /// The mirror stream failed and could not be resumed.
    #[error("Mirror stream failed after {attempts} attempts: {source}")]
    Stream {
        attempts: u32,
        #[source]
        source: MirrorError,
    },
}
