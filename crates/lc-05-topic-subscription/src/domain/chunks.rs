//! Chunk reassembly.

use shared_types::TransactionId;
use std::collections::HashMap;

use super::message::{TopicMessage, TopicResponse};

/// Collects chunks per initial transaction id and releases a message once
/// all `total` chunks have arrived.
#[derive(Debug, Default)]
pub struct ChunkAssembler {
    pending: HashMap<TransactionId, Vec<TopicResponse>>,
}

impl ChunkAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one validated response. Returns a message when one completes.
    pub fn push(&mut self, response: TopicResponse) -> Option<TopicMessage> {
        let Some(chunk) = response.chunk_info.filter(|_| !response.is_single()) else {
            return Some(TopicMessage::single(response));
        };

        let total = chunk.total as usize;
        let parts = self.pending.entry(chunk.initial_transaction_id).or_default();
        parts.push(response);
        if parts.len() < total {
            return None;
        }

        let parts = self.pending.remove(&chunk.initial_transaction_id)?;
        TopicMessage::from_chunks(parts)
    }

    /// Messages with some but not all chunks received.
    pub fn incomplete(&self) -> usize {
        self.pending.len()
    }
}
