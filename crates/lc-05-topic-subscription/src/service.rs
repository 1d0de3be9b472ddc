//! # Topic Subscription Service
//!
//! Each subscription runs in its own task that owns the running-hash state:
//!
//! ```text
//! MirrorTransport ──stream──→ [running-hash check] ──→ [chunk reassembly] ──mpsc──→ SubscriptionHandle
//!        ▲                            │
//!        └── reconnect (backoff) ◄────┘ retryable stream error
//! ```
//!
//! A reconnect resumes one nanosecond after the last validated message and
//! lowers the limit by the number of messages already received. An
//! integrity failure is delivered as the final item.

use ledger_telemetry::{metric_inc, TOPIC_INTEGRITY_FAILURES, TOPIC_MESSAGES, TOPIC_RECONNECTS};
use shared_types::{Timestamp, TopicId};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, error, info, warn};

use crate::domain::chunks::ChunkAssembler;
use crate::domain::errors::SubscriptionError;
use crate::domain::message::TopicMessage;
use crate::domain::query::TopicQuery;
use crate::domain::running_hash::ConsensusTopicRunningHash;
use crate::domain::state::TopicRunningHashState;
use crate::ports::inbound::TopicSubscriptionApi;
use crate::ports::outbound::{MirrorError, MirrorStream, MirrorTransport};

/// Messages buffered between the subscription task and the subscriber.
const DELIVERY_BUFFER: usize = 64;

type Delivery = Result<TopicMessage, SubscriptionError>;

// =============================================================================
// Handles
// =============================================================================

/// Stops a subscription. Cloneable and usable from any thread.
#[derive(Debug, Clone)]
pub struct Unsubscriber {
    stop: Arc<watch::Sender<bool>>,
}

impl Unsubscriber {
    /// Stop deliveries and release the mirror stream. Idempotent.
    pub fn unsubscribe(&self) {
        self.stop.send_replace(true);
    }

    pub fn is_unsubscribed(&self) -> bool {
        *self.stop.borrow()
    }
}

/// Receiving end of a subscription. Dropping it unsubscribes.
pub struct SubscriptionHandle {
    topic_id: TopicId,
    deliveries: mpsc::Receiver<Delivery>,
    unsubscriber: Unsubscriber,
    task: Option<JoinHandle<()>>,
}

impl SubscriptionHandle {
    pub fn topic_id(&self) -> TopicId {
        self.topic_id
    }

    /// Next validated message, or `None` once the subscription has ended.
    /// After an error item the subscription is over.
    pub async fn next_message(&mut self) -> Option<Delivery> {
        if self.unsubscriber.is_unsubscribed() {
            return None;
        }
        self.deliveries.recv().await
    }

    pub fn unsubscriber(&self) -> Unsubscriber {
        self.unsubscriber.clone()
    }

    pub fn unsubscribe(&self) {
        self.unsubscriber.unsubscribe();
    }

    pub fn is_unsubscribed(&self) -> bool {
        self.unsubscriber.is_unsubscribed()
    }

    /// Unsubscribe and wait until the task has released the mirror stream.
    pub async fn shutdown(mut self) {
        self.unsubscribe();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Stream for SubscriptionHandle {
    type Item = Delivery;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.unsubscriber.is_unsubscribed() {
            return Poll::Ready(None);
        }
        self.deliveries.poll_recv(cx)
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.unsubscriber.unsubscribe();
    }
}

// =============================================================================
// Service
// =============================================================================

/// Starts validated topic subscriptions against a mirror transport.
#[derive(Clone)]
pub struct TopicSubscriptionService {
    transport: Arc<dyn MirrorTransport>,
}

impl TopicSubscriptionService {
    pub fn new(transport: Arc<dyn MirrorTransport>) -> Self {
        Self { transport }
    }
}

impl TopicSubscriptionApi for TopicSubscriptionService {
    fn subscribe(
        &self,
        query: TopicQuery,
        initial: ConsensusTopicRunningHash,
    ) -> Result<SubscriptionHandle, SubscriptionError> {
        query.validate()?;
        if query.topic_id != initial.topic_id() {
            return Err(SubscriptionError::TopicMismatch {
                query: query.topic_id,
                state: initial.topic_id(),
            });
        }

        let topic_id = query.topic_id;
        let (stop_tx, stop_rx) = watch::channel(false);
        let (tx, rx) = mpsc::channel(DELIVERY_BUFFER);

        info!(
            topic = %topic_id,
            from_sequence = initial.sequence_number(),
            "Subscribing to topic"
        );

        let task = SubscriptionTask {
            transport: self.transport.clone(),
            query,
            state: TopicRunningHashState::new(initial),
            assembler: ChunkAssembler::new(),
            deliveries: tx,
            stop: stop_rx,
            received: 0,
            last_timestamp: None,
        };

        Ok(SubscriptionHandle {
            topic_id,
            deliveries: rx,
            unsubscriber: Unsubscriber {
                stop: Arc::new(stop_tx),
            },
            task: Some(tokio::spawn(task.run())),
        })
    }
}

// =============================================================================
// Subscription task
// =============================================================================

/// How a single stream connection ended.
enum StreamEnd {
    /// Unsubscribed, subscriber gone, or integrity failure delivered.
    Stopped,
    /// The mirror finished the query.
    Completed,
    Failed(MirrorError),
}

struct SubscriptionTask {
    transport: Arc<dyn MirrorTransport>,
    query: TopicQuery,
    state: TopicRunningHashState,
    assembler: ChunkAssembler,
    deliveries: mpsc::Sender<Delivery>,
    stop: watch::Receiver<bool>,
    received: u64,
    last_timestamp: Option<Timestamp>,
}

/// Resolves once the subscription is stopped or every handle is gone.
async fn stopped(stop: &mut watch::Receiver<bool>) {
    let _ = stop.wait_for(|stopped| *stopped).await;
}

impl SubscriptionTask {
    async fn run(mut self) {
        let topic = self.query.topic_id;
        let mut attempt: u32 = 0;

        loop {
            if self.query.is_satisfied(self.received) {
                info!(topic = %topic, received = self.received, "Subscription limit reached");
                return;
            }

            let query = match self.last_timestamp {
                Some(last) => self.query.resume_after(last, self.received),
                None => self.query.clone(),
            };

            let opened = tokio::select! {
                biased;
                _ = stopped(&mut self.stop) => return,
                opened = self.transport.subscribe_topic(&query) => opened,
            };

            let failure = match opened {
                Ok(stream) => match self.drain(stream).await {
                    StreamEnd::Stopped => return,
                    StreamEnd::Completed => {
                        info!(topic = %topic, received = self.received, "Subscription complete");
                        return;
                    }
                    StreamEnd::Failed(failure) => failure,
                },
                Err(failure) => failure,
            };

            if !failure.is_retryable() || attempt >= self.query.max_attempts {
                error!(topic = %topic, attempt, error = %failure, "Subscription failed");
                self.deliver(Err(SubscriptionError::Stream {
                    attempts: attempt + 1,
                    source: failure,
                }))
                .await;
                return;
            }

            let delay = self.query.reconnect_delay(attempt);
            warn!(
                topic = %topic,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %failure,
                "Mirror stream failed, reconnecting"
            );
            metric_inc!(TOPIC_RECONNECTS);

            tokio::select! {
                biased;
                _ = stopped(&mut self.stop) => return,
                _ = tokio::time::sleep(delay) => {}
            }
            attempt += 1;
        }
    }

    /// Validate and deliver everything `stream` yields. The stream is
    /// dropped on return.
    async fn drain(&mut self, mut stream: MirrorStream) -> StreamEnd {
        loop {
            let item = tokio::select! {
                biased;
                _ = stopped(&mut self.stop) => return StreamEnd::Stopped,
                item = stream.next() => item,
            };

            let response = match item {
                None => return StreamEnd::Completed,
                Some(Err(failure)) => return StreamEnd::Failed(failure),
                Some(Ok(response)) => response,
            };

            if let Err(integrity) = self.state.apply(
                &response.contents,
                response.sequence_number,
                &response.running_hash,
                response.consensus_timestamp,
            ) {
                metric_inc!(TOPIC_INTEGRITY_FAILURES);
                error!(error = %integrity, "Topic stream failed validation");
                self.deliver(Err(integrity.into())).await;
                return StreamEnd::Stopped;
            }

            self.received += 1;
            self.last_timestamp = Some(response.consensus_timestamp);
            debug!(sequence = response.sequence_number, "Topic response validated");

            if let Some(message) = self.assembler.push(response) {
                metric_inc!(TOPIC_MESSAGES);
                if !self.deliver(Ok(message)).await {
                    return StreamEnd::Stopped;
                }
            }
        }
    }

    /// Hand one item to the subscriber. `false` once nobody is listening.
    async fn deliver(&mut self, item: Delivery) -> bool {
        tokio::select! {
            biased;
            _ = stopped(&mut self.stop) => false,
            sent = self.deliveries.send(item) => sent.is_ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryMirror, MirrorFault};
    use crate::domain::errors::TopicIntegrityError;
    use crate::domain::message::ChunkInfo;
    use shared_types::{AccountId, TransactionId};
    use std::time::Duration;

    fn topic() -> TopicId {
        TopicId::new(0, 0, 1234)
    }

    fn at(secs: i64) -> Timestamp {
        Timestamp::new(1_700_000_000 + secs, 0)
    }

    fn service(mirror: &Arc<InMemoryMirror>) -> TopicSubscriptionService {
        TopicSubscriptionService::new(mirror.clone())
    }

    fn genesis() -> ConsensusTopicRunningHash {
        ConsensusTopicRunningHash::for_new_topic(topic())
    }

    #[tokio::test]
    async fn test_delivers_validated_messages_in_order() {
        let mirror = Arc::new(InMemoryMirror::new());
        for (i, text) in ["one", "two", "three"].iter().enumerate() {
            mirror.publish(topic(), text.as_bytes(), at(i as i64));
        }

        let mut handle = service(&mirror)
            .subscribe(TopicQuery::new(topic()).with_limit(3), genesis())
            .unwrap();

        let mut contents = Vec::new();
        while let Some(message) = handle.next_message().await {
            contents.push(String::from_utf8(message.unwrap().contents).unwrap());
        }
        assert_eq!(contents, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_tampered_message_ends_subscription() {
        let mirror = Arc::new(InMemoryMirror::new());
        let first = mirror.publish(topic(), b"one", at(0));
        let mut forged = first.clone();
        forged.sequence_number = 2;
        forged.consensus_timestamp = at(1);
        forged.contents = b"forged".to_vec();
        mirror.publish_raw(topic(), forged);

        let mut handle = service(&mirror)
            .subscribe(TopicQuery::new(topic()), genesis())
            .unwrap();

        assert_eq!(handle.next_message().await.unwrap().unwrap().contents, b"one");
        let err = handle.next_message().await.unwrap().unwrap_err();
        assert!(matches!(
            err,
            SubscriptionError::Integrity(TopicIntegrityError::HashMismatch {
                sequence_number: 2,
                ..
            })
        ));
        assert!(handle.next_message().await.is_none());
    }

    #[tokio::test]
    async fn test_gap_is_detected() {
        let mirror = Arc::new(InMemoryMirror::new());
        mirror.publish(topic(), b"one", at(0));
        mirror.publish(topic(), b"two", at(1));

        // Starting after message 1 with a genesis state leaves a gap.
        let query = TopicQuery::new(topic()).with_start_time(at(1));
        let mut handle = service(&mirror).subscribe(query, genesis()).unwrap();

        let err = handle.next_message().await.unwrap().unwrap_err();
        assert_eq!(
            err,
            SubscriptionError::Integrity(TopicIntegrityError::SequenceMismatch {
                topic_id: topic(),
                expected: 1,
                actual: 2,
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconnect_resumes_after_last_message() {
        let mirror = Arc::new(InMemoryMirror::new());
        for i in 0..4 {
            mirror.publish(topic(), format!("m{i}").as_bytes(), at(i));
        }
        mirror.inject_fault(MirrorFault::FailAfter(
            2,
            MirrorError::Unavailable("connection reset".into()),
        ));

        let mut handle = service(&mirror)
            .subscribe(TopicQuery::new(topic()).with_limit(4), genesis())
            .unwrap();

        let mut sequences = Vec::new();
        while let Some(message) = handle.next_message().await {
            sequences.push(message.unwrap().sequence_number);
        }
        assert_eq!(sequences, vec![1, 2, 3, 4]);

        let queries = mirror.queries();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[1].start_time, Some(at(1).plus_nanos(1)));
        assert_eq!(queries[1].limit, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_is_delivered() {
        let mirror = Arc::new(InMemoryMirror::new());
        mirror.inject_fault(MirrorFault::Refuse(MirrorError::Other("denied".into())));

        let mut handle = service(&mirror)
            .subscribe(TopicQuery::new(topic()), genesis())
            .unwrap();

        let err = handle.next_message().await.unwrap().unwrap_err();
        assert!(matches!(
            err,
            SubscriptionError::Stream {
                attempts: 1,
                source: MirrorError::Other(_),
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let mirror = Arc::new(InMemoryMirror::new());
        for _ in 0..3 {
            mirror.inject_fault(MirrorFault::Refuse(MirrorError::NotFound("0.0.1234".into())));
        }

        let mut handle = service(&mirror)
            .subscribe(TopicQuery::new(topic()).with_max_attempts(2), genesis())
            .unwrap();

        let err = handle.next_message().await.unwrap().unwrap_err();
        assert!(matches!(err, SubscriptionError::Stream { attempts: 3, .. }));
        assert_eq!(mirror.queries().len(), 3);
    }

    #[tokio::test]
    async fn test_chunked_message_reassembled() {
        let mirror = Arc::new(InMemoryMirror::new());
        let initial = TransactionId::new(AccountId::new(0, 0, 2), at(-1));
        let chunk = |number| ChunkInfo {
            initial_transaction_id: initial,
            number,
            total: 2,
        };
        mirror.publish_chunk(topic(), b"hello ", at(0), chunk(1));
        mirror.publish_chunk(topic(), b"world", at(1), chunk(2));

        let mut handle = service(&mirror)
            .subscribe(TopicQuery::new(topic()).with_limit(2), genesis())
            .unwrap();

        let message = handle.next_message().await.unwrap().unwrap();
        assert_eq!(message.contents, b"hello world");
        assert_eq!(message.transaction_id, Some(initial));
        assert_eq!(message.sequence_number, 2);
        assert!(handle.next_message().await.is_none());
    }

    #[tokio::test]
    async fn test_unsubscribe_releases_stream() {
        let mirror = Arc::new(InMemoryMirror::new());
        mirror.publish(topic(), b"one", at(0));

        let mut handle = service(&mirror)
            .subscribe(TopicQuery::new(topic()), genesis())
            .unwrap();
        assert!(handle.next_message().await.unwrap().is_ok());
        assert_eq!(mirror.open_streams(), 1);

        let unsubscriber = handle.unsubscriber();
        std::thread::spawn(move || unsubscriber.unsubscribe())
            .join()
            .unwrap();

        assert!(handle.next_message().await.is_none());
        handle.shutdown().await;
        assert_eq!(mirror.open_streams(), 0);
    }

    #[tokio::test]
    async fn test_drop_unsubscribes() {
        let mirror = Arc::new(InMemoryMirror::new());
        mirror.publish(topic(), b"one", at(0));

        let mut handle = service(&mirror)
            .subscribe(TopicQuery::new(topic()), genesis())
            .unwrap();
        assert!(handle.next_message().await.is_some());
        drop(handle);

        tokio::time::timeout(Duration::from_secs(1), async {
            while mirror.open_streams() > 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_handle_is_a_stream() {
        let mirror = Arc::new(InMemoryMirror::new());
        mirror.publish(topic(), b"one", at(0));
        mirror.publish(topic(), b"two", at(1));

        let handle = service(&mirror)
            .subscribe(TopicQuery::new(topic()).with_limit(2), genesis())
            .unwrap();
        let messages: Vec<Delivery> = handle.collect().await;

        assert_eq!(messages.len(), 2);
        assert!(messages.iter().all(Result::is_ok));
    }

    #[tokio::test]
    async fn test_rejects_mismatched_state() {
        let mirror = Arc::new(InMemoryMirror::new());
        let err = service(&mirror)
            .subscribe(
                TopicQuery::new(topic()),
                ConsensusTopicRunningHash::for_new_topic(TopicId::new(0, 0, 9)),
            )
            .err()
            .unwrap();
        assert!(matches!(err, SubscriptionError::TopicMismatch { .. }));
    }

    #[tokio::test]
    async fn test_resume_from_known_state() {
        let mirror = Arc::new(InMemoryMirror::new());
        mirror.publish(topic(), b"one", at(0));
        let known = mirror.chain(topic());
        mirror.publish(topic(), b"two", at(1));

        let query = TopicQuery::new(topic())
            .with_start_time(at(0).plus_nanos(1))
            .with_limit(1);
        let mut handle = service(&mirror).subscribe(query, known).unwrap();

        let message = handle.next_message().await.unwrap().unwrap();
        assert_eq!(message.sequence_number, 2);
        assert_eq!(message.contents, b"two");
    }
}
