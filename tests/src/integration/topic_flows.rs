//! # Topic Flows
//!
//! Mirror stream → running-hash validation → subscriber, including resume
//! from a receipt's running hash and recovery from stream failures.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use lc_03_node_pool::{NodeEndpoint, NodePool};
    use lc_04_execution::{QueryAnswer, ScriptedTransport};
    use lc_05_topic_subscription::{
        ConsensusTopicRunningHash, InMemoryMirror, MirrorError, MirrorFault, SubscriptionError,
        TopicIntegrityError, TopicQuery,
    };
    use ledger_client::{Client, ClientError};
    use shared_crypto::PrivateKey;
    use shared_types::{AccountId, Status, Timestamp, TopicId, TransactionReceipt};

    const TOPIC: TopicId = TopicId::new(0, 0, 1234);

    const FIRST_HASH: &str = "4084b9af9f0fb3490e7aea7a6be4d8e649c30fa4bca97756b7f370cd25fbd09674e83be19be1c9b4137d5ad0674ba165";
    const SECOND_HASH: &str = "65e2b619cebfde118bce537b57b402438a0946cc27c64a7a839ba1224bcf31dfa99b002a8c5445d65185839056da5956";

    fn client(mirror: &Arc<InMemoryMirror>, transport: &Arc<ScriptedTransport>) -> Client {
        let pool = NodePool::new(vec![NodeEndpoint::new(
            "127.0.0.1",
            50211,
            AccountId::new(0, 0, 3),
        )])
        .unwrap();
        Client::new(Arc::new(pool), transport.clone())
            .with_operator(AccountId::new(0, 0, 2), Arc::new(PrivateKey::generate_ed25519()))
            .with_mirror(mirror.clone())
    }

    fn genesis() -> ConsensusTopicRunningHash {
        ConsensusTopicRunningHash::for_new_topic(TOPIC)
    }

    #[tokio::test]
    async fn test_subscriber_sees_golden_chain() {
        let mirror = Arc::new(InMemoryMirror::new());
        mirror.publish(TOPIC, b"first message", Timestamp::new(1_234_567_890, 0));
        mirror.publish(TOPIC, b"second message", Timestamp::new(1_234_567_891, 500));
        let client = client(&mirror, &Arc::new(ScriptedTransport::new()));

        let mut handle = client
            .subscribe_topic(TopicQuery::new(TOPIC).with_limit(2), genesis())
            .unwrap();

        let first = handle.next_message().await.unwrap().unwrap();
        let second = handle.next_message().await.unwrap().unwrap();
        assert_eq!(hex::encode(&first.running_hash), FIRST_HASH);
        assert_eq!(hex::encode(&second.running_hash), SECOND_HASH);
        assert_eq!(second.sequence_number, 2);
        assert!(handle.next_message().await.is_none());
    }

    /// A receipt's running hash is a trusted point to subscribe from.
    #[tokio::test(start_paused = true)]
    async fn test_resume_from_receipt_running_hash() {
        let mirror = Arc::new(InMemoryMirror::new());
        let transport = Arc::new(ScriptedTransport::new());
        let client = client(&mirror, &transport);

        let submitted = mirror.publish(TOPIC, b"ours", Timestamp::new(1_700_000_000, 0));
        mirror.publish(TOPIC, b"theirs", Timestamp::new(1_700_000_001, 0));

        let id = client.transaction_id().unwrap();
        let mut receipt = TransactionReceipt::with_status(id, Status::Success);
        receipt.topic_sequence_number = Some(submitted.sequence_number);
        receipt.topic_running_hash = Some(submitted.running_hash.clone());
        transport.script_receipts(id, [Ok(QueryAnswer::ok(receipt))]);

        let receipt = client.get_receipt(id).await.unwrap();
        let mut hash = [0u8; 48];
        hash.copy_from_slice(receipt.topic_running_hash.as_deref().unwrap());
        let state = ConsensusTopicRunningHash::new(
            TOPIC,
            receipt.topic_sequence_number.unwrap(),
            hash,
        );

        let query = TopicQuery::new(TOPIC)
            .with_start_time(submitted.consensus_timestamp.plus_nanos(1))
            .with_limit(1);
        let mut handle = client.subscribe_topic(query, state).unwrap();
        let next = handle.next_message().await.unwrap().unwrap();
        assert_eq!(next.contents, b"theirs");
        assert_eq!(next.sequence_number, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_reset_is_invisible_to_subscriber() {
        let mirror = Arc::new(InMemoryMirror::new());
        for i in 0..5 {
            mirror.publish(TOPIC, format!("m{i}").as_bytes(), Timestamp::new(100 + i, 0));
        }
        mirror.inject_fault(MirrorFault::FailAfter(1, MirrorError::StreamReset("RST_STREAM".into())));
        mirror.inject_fault(MirrorFault::Refuse(MirrorError::Unavailable("restarting".into())));
        mirror.inject_fault(MirrorFault::FailAfter(2, MirrorError::ResourceExhausted("slow down".into())));
        let client = client(&mirror, &Arc::new(ScriptedTransport::new()));

        let mut handle = client
            .subscribe_topic(TopicQuery::new(TOPIC).with_limit(5), genesis())
            .unwrap();
        let mut sequences = Vec::new();
        while let Some(message) = handle.next_message().await {
            sequences.push(message.unwrap().sequence_number);
        }
        assert_eq!(sequences, vec![1, 2, 3, 4, 5]);

        let limits: Vec<u64> = mirror.queries().iter().map(|q| q.limit).collect();
        assert_eq!(limits, vec![5, 4, 4, 2]);
    }

    #[tokio::test]
    async fn test_reordered_stream_is_rejected() {
        let mirror = Arc::new(InMemoryMirror::new());
        let first = mirror.publish(TOPIC, b"a", Timestamp::new(100, 0));
        let second = mirror.publish(TOPIC, b"b", Timestamp::new(101, 0));

        // Replay the log to a second topic with the messages swapped.
        let swapped = TopicId::new(0, 0, 9999);
        for response in [second, first] {
            mirror.publish_raw(swapped, response);
        }
        let client = client(&mirror, &Arc::new(ScriptedTransport::new()));

        let mut handle = client
            .subscribe_topic(
                TopicQuery::new(swapped),
                ConsensusTopicRunningHash::for_new_topic(swapped),
            )
            .unwrap();
        let err = handle.next_message().await.unwrap().unwrap_err();
        assert!(matches!(
            err,
            SubscriptionError::Integrity(TopicIntegrityError::SequenceMismatch {
                expected: 1,
                actual: 2,
                ..
            })
        ));
        assert!(handle.next_message().await.is_none());
    }

    #[tokio::test]
    async fn test_unsubscribe_from_another_thread() {
        let mirror = Arc::new(InMemoryMirror::new());
        mirror.publish(TOPIC, b"only", Timestamp::new(100, 0));
        let client = client(&mirror, &Arc::new(ScriptedTransport::new()));

        let mut handle = client.subscribe_topic(TopicQuery::new(TOPIC), genesis()).unwrap();
        assert!(handle.next_message().await.unwrap().is_ok());

        let unsubscriber = handle.unsubscriber();
        std::thread::spawn(move || unsubscriber.unsubscribe())
            .join()
            .unwrap();
        assert!(handle.is_unsubscribed());
        assert!(handle.next_message().await.is_none());

        // Publishing after unsubscribe reaches nobody.
        mirror.publish(TOPIC, b"late", Timestamp::new(101, 0));
        handle.shutdown().await;
        assert_eq!(mirror.open_streams(), 0);
    }

    #[tokio::test]
    async fn test_invalid_query_rejected_by_client() {
        let mirror = Arc::new(InMemoryMirror::new());
        let client = client(&mirror, &Arc::new(ScriptedTransport::new()));

        let query = TopicQuery::new(TOPIC).with_max_backoff(Duration::from_millis(10));
        let err = client.subscribe_topic(query, genesis()).err().unwrap();
        assert!(matches!(
            err,
            ClientError::Subscription(SubscriptionError::InvalidQuery(_))
        ));
        assert!(mirror.queries().is_empty());
    }
}
