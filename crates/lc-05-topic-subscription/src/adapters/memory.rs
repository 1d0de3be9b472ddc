//! # In-Memory Mirror
//!
//! A [`MirrorTransport`] over an in-process topic log. Published messages
//! are hash-chained exactly as the network would chain them, so streams
//! from this mirror validate; [`InMemoryMirror::publish_raw`] and
//! [`MirrorFault`] inject corruption and connection failures.
//!
//! A stream replays the log as it was when the stream opened, filtered by
//! the query. It then completes if the query has an end time or a limit it
//! has reached, and otherwise stays open like a live tail.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{Timestamp, TopicId};
use std::collections::{HashMap, VecDeque};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio_stream::{Stream, StreamExt};

use crate::domain::message::{ChunkInfo, TopicResponse};
use crate::domain::query::TopicQuery;
use crate::domain::running_hash::ConsensusTopicRunningHash;
use crate::ports::outbound::{MirrorError, MirrorStream, MirrorTransport};

/// Failure applied to the next stream opened.
#[derive(Debug, Clone)]
pub enum MirrorFault {
    /// Refuse to open the stream.
    Refuse(MirrorError),
    /// Deliver this many responses, then fail the stream.
    FailAfter(usize, MirrorError),
}

struct TopicLog {
    chain: ConsensusTopicRunningHash,
    responses: Vec<TopicResponse>,
}

/// In-process mirror node.
#[derive(Default)]
pub struct InMemoryMirror {
    topics: Mutex<HashMap<TopicId, TopicLog>>,
    faults: Mutex<VecDeque<MirrorFault>>,
    queries: Mutex<Vec<TopicQuery>>,
    open_streams: Arc<AtomicUsize>,
}

impl InMemoryMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to `topic`, advancing its running hash.
    pub fn publish(&self, topic: TopicId, contents: &[u8], at: Timestamp) -> TopicResponse {
        self.append(topic, contents, at, None)
    }

    /// Append one chunk of a chunked message.
    pub fn publish_chunk(
        &self,
        topic: TopicId,
        contents: &[u8],
        at: Timestamp,
        chunk: ChunkInfo,
    ) -> TopicResponse {
        self.append(topic, contents, at, Some(chunk))
    }

    /// Append `response` verbatim without touching the chain.
    pub fn publish_raw(&self, topic: TopicId, response: TopicResponse) {
        let mut topics = self.topics.lock();
        topics
            .entry(topic)
            .or_insert_with(|| TopicLog {
                chain: ConsensusTopicRunningHash::for_new_topic(topic),
                responses: Vec::new(),
            })
            .responses
            .push(response);
    }

    /// Running-hash state after everything published so far.
    pub fn chain(&self, topic: TopicId) -> ConsensusTopicRunningHash {
        self.topics
            .lock()
            .get(&topic)
            .map_or_else(|| ConsensusTopicRunningHash::for_new_topic(topic), |log| log.chain)
    }

    /// Queue a fault for the next stream opened.
    pub fn inject_fault(&self, fault: MirrorFault) {
        self.faults.lock().push_back(fault);
    }

    /// Every query received, in order.
    pub fn queries(&self) -> Vec<TopicQuery> {
        self.queries.lock().clone()
    }

    /// Streams not yet dropped by their subscriber.
    pub fn open_streams(&self) -> usize {
        self.open_streams.load(Ordering::SeqCst)
    }

    fn append(
        &self,
        topic: TopicId,
        contents: &[u8],
        at: Timestamp,
        chunk_info: Option<ChunkInfo>,
    ) -> TopicResponse {
        let mut topics = self.topics.lock();
        let log = topics.entry(topic).or_insert_with(|| TopicLog {
            chain: ConsensusTopicRunningHash::for_new_topic(topic),
            responses: Vec::new(),
        });
        log.chain = log.chain.update(contents, at);
        let response = TopicResponse {
            consensus_timestamp: at,
            contents: contents.to_vec(),
            running_hash: log.chain.running_hash().to_vec(),
            sequence_number: log.chain.sequence_number(),
            chunk_info,
        };
        log.responses.push(response.clone());
        response
    }

    fn replay(&self, query: &TopicQuery) -> Vec<TopicResponse> {
        let topics = self.topics.lock();
        let Some(log) = topics.get(&query.topic_id) else {
            return Vec::new();
        };
        let selected = log.responses.iter().filter(|response| {
            query
                .start_time
                .map_or(true, |start| response.consensus_timestamp >= start)
                && query
                    .end_time
                    .map_or(true, |end| response.consensus_timestamp < end)
        });
        match query.limit {
            0 => selected.cloned().collect(),
            limit => selected.take(limit as usize).cloned().collect(),
        }
    }
}

#[async_trait]
impl MirrorTransport for InMemoryMirror {
    async fn subscribe_topic(&self, query: &TopicQuery) -> Result<MirrorStream, MirrorError> {
        self.queries.lock().push(query.clone());
        let fault = self.faults.lock().pop_front();

        let responses = self.replay(query);
        let ends = query.end_time.is_some()
            || (query.limit > 0 && responses.len() as u64 >= query.limit);

        let items: Vec<Result<TopicResponse, MirrorError>> = match fault {
            Some(MirrorFault::Refuse(error)) => return Err(error),
            Some(MirrorFault::FailAfter(count, error)) => responses
                .into_iter()
                .take(count)
                .map(Ok)
                .chain(std::iter::once(Err(error)))
                .collect(),
            None => responses.into_iter().map(Ok).collect(),
        };

        let replay = tokio_stream::iter(items);
        let inner: MirrorStream = if ends {
            Box::pin(replay)
        } else {
            Box::pin(replay.chain(tokio_stream::pending()))
        };
        Ok(Box::pin(TrackedStream::new(inner, self.open_streams.clone())))
    }
}

/// Counts itself in `open` until dropped.
struct TrackedStream {
    inner: MirrorStream,
    open: Arc<AtomicUsize>,
}

impl TrackedStream {
    fn new(inner: MirrorStream, open: Arc<AtomicUsize>) -> Self {
        open.fetch_add(1, Ordering::SeqCst);
        Self { inner, open }
    }
}

impl Stream for TrackedStream {
    type Item = Result<TopicResponse, MirrorError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl Drop for TrackedStream {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}
