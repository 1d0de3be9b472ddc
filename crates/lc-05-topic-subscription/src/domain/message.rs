//! # Topic Messages
//!
//! [`TopicResponse`] is one consensus message as streamed by a mirror node.
//! A logical [`TopicMessage`] is either a single response or the ordered
//! concatenation of several chunks that share an initial transaction id.

use serde::{Deserialize, Serialize};
use shared_types::{Timestamp, TransactionId};

/// Position of a response within a chunked message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkInfo {
    /// Id of the first chunk's transaction; groups the chunks.
    pub initial_transaction_id: TransactionId,
    /// 1-based chunk number.
    pub number: u32,
    pub total: u32,
}

/// One message as delivered by the mirror stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicResponse {
    pub consensus_timestamp: Timestamp,
    pub contents: Vec<u8>,
    pub running_hash: Vec<u8>,
    pub sequence_number: u64,
    pub chunk_info: Option<ChunkInfo>,
}

impl TopicResponse {
    /// Whether this response is a complete message on its own.
    pub fn is_single(&self) -> bool {
        self.chunk_info.map_or(true, |chunk| chunk.total <= 1)
    }
}

/// Metadata of one chunk of a reassembled message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMessageChunk {
    pub consensus_timestamp: Timestamp,
    pub content_size: usize,
    pub running_hash: Vec<u8>,
    pub sequence_number: u64,
}

impl From<&TopicResponse> for TopicMessageChunk {
    fn from(response: &TopicResponse) -> Self {
        Self {
            consensus_timestamp: response.consensus_timestamp,
            content_size: response.contents.len(),
            running_hash: response.running_hash.clone(),
            sequence_number: response.sequence_number,
        }
    }
}

/// A validated, complete message delivered to subscribers.
///
/// For chunked messages the timestamp, running hash and sequence number
/// are those of the last chunk to reach consensus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMessage {
    pub consensus_timestamp: Timestamp,
    pub contents: Vec<u8>,
    pub running_hash: Vec<u8>,
    pub sequence_number: u64,
    /// Per-chunk metadata; `None` for unchunked messages.
    pub chunks: Option<Vec<TopicMessageChunk>>,
    /// Initial transaction id of a chunked message.
    pub transaction_id: Option<TransactionId>,
}

impl TopicMessage {
    pub fn single(response: TopicResponse) -> Self {
        Self {
            consensus_timestamp: response.consensus_timestamp,
            transaction_id: response.chunk_info.map(|chunk| chunk.initial_transaction_id),
            contents: response.contents,
            running_hash: response.running_hash,
            sequence_number: response.sequence_number,
            chunks: None,
        }
    }

    /// Join chunks in chunk-number order. Returns `None` for an empty list.
    pub fn from_chunks(mut responses: Vec<TopicResponse>) -> Option<Self> {
        responses.sort_by_key(|response| response.chunk_info.map_or(0, |chunk| chunk.number));

        let last = responses
            .iter()
            .max_by_key(|response| response.consensus_timestamp)?
            .clone();
        let transaction_id = responses
            .first()
            .and_then(|response| response.chunk_info)
            .map(|chunk| chunk.initial_transaction_id);

        let chunks = responses.iter().map(TopicMessageChunk::from).collect();
        let contents = responses
            .into_iter()
            .flat_map(|response| response.contents)
            .collect();

        Some(Self {
            consensus_timestamp: last.consensus_timestamp,
            contents,
            running_hash: last.running_hash,
            sequence_number: last.sequence_number,
            chunks: Some(chunks),
            transaction_id,
        })
    }
}
