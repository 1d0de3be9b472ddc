//! Stateful running-hash validation for one subscription.

use shared_types::Timestamp;
use tracing::trace;

use super::errors::TopicIntegrityError;
use super::running_hash::ConsensusTopicRunningHash;

/// Current position in a topic's chain, advanced one validated message at
/// a time. Rejected messages leave it unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRunningHashState {
    current: ConsensusTopicRunningHash,
}

impl TopicRunningHashState {
    pub fn new(initial: ConsensusTopicRunningHash) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> &ConsensusTopicRunningHash {
        &self.current
    }

    /// Whether `message` would be accepted. Does not change the state.
    pub fn verify(
        &self,
        message: &[u8],
        expected_sequence: u64,
        expected_hash: &[u8],
        consensus_timestamp: Timestamp,
    ) -> bool {
        self.check(message, expected_sequence, expected_hash, consensus_timestamp)
            .is_ok()
    }

    /// Accept `message` if it extends the chain with exactly
    /// `expected_sequence` and `expected_hash`.
    pub fn apply(
        &mut self,
        message: &[u8],
        expected_sequence: u64,
        expected_hash: &[u8],
        consensus_timestamp: Timestamp,
    ) -> Result<(), TopicIntegrityError> {
        self.current = self.check(message, expected_sequence, expected_hash, consensus_timestamp)?;
        trace!(
            topic = %self.current.topic_id(),
            sequence = self.current.sequence_number(),
            "Running hash advanced"
        );
        Ok(())
    }

    fn check(
        &self,
        message: &[u8],
        expected_sequence: u64,
        expected_hash: &[u8],
        consensus_timestamp: Timestamp,
    ) -> Result<ConsensusTopicRunningHash, TopicIntegrityError> {
        let topic_id = self.current.topic_id();
        let next_sequence = self.current.sequence_number().wrapping_add(1);
        if expected_sequence != next_sequence {
            return Err(TopicIntegrityError::SequenceMismatch {
                topic_id,
                expected: next_sequence,
                actual: expected_sequence,
            });
        }

        let next = self.current.update(message, consensus_timestamp);
        if next.running_hash().as_slice() != expected_hash {
            return Err(TopicIntegrityError::HashMismatch {
                topic_id,
                sequence_number: expected_sequence,
                consensus_timestamp,
                expected: hex::encode(next.running_hash()),
                actual: hex::encode(expected_hash),
            });
        }
        Ok(next)
    }
}
