//! # Consensus Topic Running Hash
//!
//! Every message accepted on a topic folds into a SHA-384 chain. Given the
//! previous hash, the topic id, the consensus timestamp, the new sequence
//! number and the message bytes, the next hash is fully determined.
//!
//! ## Digest Input
//!
//! The chain is defined over a legacy object-stream encoding of these
//! fields, byte for byte:
//!
//! ```text
//! AC ED 00 05                                  stream header
//! 75 72 00 02 5B 42 AC F3 17 F8 06 08 54 E0    byte[] + class descriptor "[B"
//! 02 00 00 78 70                               serializable, no fields, end, no super
//! <u32 BE 48> <previous running hash>
//! 77 2C                                        block data, 44 bytes:
//!   <i64 shard> <i64 realm> <i64 num>
//!   <i64 seconds> <i32 nanos>
//!   <i64 next sequence number>
//! 75 71 00 7E 00 00                            byte[] reusing descriptor handle 0
//! <u32 BE len> <message bytes>
//! ```

use shared_crypto::{Sha384Hash, Sha384Hasher, SHA384_LEN};
use shared_types::{Timestamp, TopicId};
use std::fmt;

const STREAM_HEADER: [u8; 4] = [0xAC, 0xED, 0x00, 0x05];

const BYTE_ARRAY_WITH_DESCRIPTOR: [u8; 19] = [
    0x75, 0x72, 0x00, 0x02, 0x5B, 0x42, 0xAC, 0xF3, 0x17, 0xF8, 0x06, 0x08, 0x54, 0xE0, 0x02,
    0x00, 0x00, 0x78, 0x70,
];

/// Topic id (3 x i64), timestamp (i64 + i32) and sequence number (i64).
const BLOCK_DATA_HEADER: [u8; 2] = [0x77, 44];

const BYTE_ARRAY_BY_REFERENCE: [u8; 6] = [0x75, 0x71, 0x00, 0x7E, 0x00, 0x00];

/// Running-hash state of one topic after `sequence_number` messages.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConsensusTopicRunningHash {
    topic_id: TopicId,
    sequence_number: u64,
    running_hash: Sha384Hash,
}

impl ConsensusTopicRunningHash {
    /// State of a topic that has not accepted any message.
    pub fn for_new_topic(topic_id: TopicId) -> Self {
        Self {
            topic_id,
            sequence_number: 0,
            running_hash: [0u8; SHA384_LEN],
        }
    }

    /// Resume from a known-good point, such as a topic-info query.
    pub fn new(topic_id: TopicId, sequence_number: u64, running_hash: Sha384Hash) -> Self {
        Self {
            topic_id,
            sequence_number,
            running_hash,
        }
    }

    pub fn topic_id(&self) -> TopicId {
        self.topic_id
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn running_hash(&self) -> &Sha384Hash {
        &self.running_hash
    }

    /// Hash the chain must have after `message` is accepted at
    /// `consensus_timestamp`.
    pub fn expected_next_hash(&self, message: &[u8], consensus_timestamp: Timestamp) -> Sha384Hash {
        let topic = self.topic_id.entity();
        let next_sequence = self.sequence_number.wrapping_add(1);

        let mut hasher = Sha384Hasher::new();
        hasher
            .update(&STREAM_HEADER)
            .update(&BYTE_ARRAY_WITH_DESCRIPTOR)
            .update(&(SHA384_LEN as u32).to_be_bytes())
            .update(&self.running_hash)
            .update(&BLOCK_DATA_HEADER)
            .update(&topic.shard.to_be_bytes())
            .update(&topic.realm.to_be_bytes())
            .update(&topic.num.to_be_bytes())
            .update(&consensus_timestamp.seconds().to_be_bytes())
            .update(&consensus_timestamp.nanos().to_be_bytes())
            .update(&next_sequence.to_be_bytes())
            .update(&BYTE_ARRAY_BY_REFERENCE)
            .update(&(message.len() as u32).to_be_bytes())
            .update(message);
        hasher.finalize()
    }

    /// State after accepting `message`. Does not modify `self`.
    #[must_use]
    pub fn update(&self, message: &[u8], consensus_timestamp: Timestamp) -> Self {
        Self {
            topic_id: self.topic_id,
            sequence_number: self.sequence_number.wrapping_add(1),
            running_hash: self.expected_next_hash(message, consensus_timestamp),
        }
    }
}

impl fmt::Debug for ConsensusTopicRunningHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsensusTopicRunningHash")
            .field("topic_id", &self.topic_id)
            .field("sequence_number", &self.sequence_number)
            .field("running_hash", &hex::encode(self.running_hash))
            .finish()
    }
}
