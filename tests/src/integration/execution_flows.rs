//! # Execution Flows
//!
//! Transaction id → envelope → multi-node submission → receipt, across
//! LC-01 through LC-04 and the client facade.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;

    use lc_01_transaction_id::{ManualClock, TransactionIdGenerator};
    use lc_02_signing_envelope::{SigningEnvelope, TransactionBody};
    use lc_03_node_pool::{NodeEndpoint, NodePool};
    use lc_04_execution::{
        ExecutionEngine, ExecutionError, QueryAnswer, RequestKind, RetryPolicy,
        ScriptedTransport, TimeoutReason,
    };
    use ledger_client::{Client, ClientError};
    use shared_crypto::{PrivateKey, SigningCapability};
    use shared_types::{AccountId, Status, Timestamp, TransactionReceipt};

    // =========================================================================
    // FIXTURES
    // =========================================================================

    const PAYER: AccountId = AccountId::new(0, 0, 2);
    const NODE_A: AccountId = AccountId::new(0, 0, 3);
    const NODE_B: AccountId = AccountId::new(0, 0, 4);
    const NODE_C: AccountId = AccountId::new(0, 0, 5);

    fn three_node_pool() -> Arc<NodePool> {
        let nodes = [(NODE_A, 50211), (NODE_B, 50212), (NODE_C, 50213)]
            .into_iter()
            .map(|(account, port)| NodeEndpoint::new("127.0.0.1", port, account))
            .collect();
        Arc::new(NodePool::new(nodes).unwrap())
    }

    fn single_node_pool() -> Arc<NodePool> {
        Arc::new(NodePool::new(vec![NodeEndpoint::new("127.0.0.1", 50211, NODE_A)]).unwrap())
    }

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_backoff: Duration::ZERO,
            backoff_multiplier: 2.0,
            max_backoff: Duration::from_millis(100),
            overall_timeout: Duration::from_secs(30),
        }
    }

    fn signed_envelope(key: &PrivateKey) -> SigningEnvelope {
        let ids = TransactionIdGenerator::new(ManualClock::new(Timestamp::new(1_700_000_000, 0)));
        let body = TransactionBody::new(ids.next(PAYER), b"transfer 10 to 0.0.1001".to_vec());
        let mut envelope = SigningEnvelope::new(&body).unwrap();
        envelope.freeze().sign(key).unwrap();
        envelope
    }

    // =========================================================================
    // END-TO-END
    // =========================================================================

    /// Node A always BUSY, node B OK: the transfer lands on B and the
    /// receipt poll sees pending, pending, success.
    #[tokio::test(start_paused = true)]
    async fn test_transfer_succeeds_via_healthy_node() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.script_node(NODE_A, [Ok(Status::Busy)]);
        transport.script_node(NODE_B, [Ok(Status::Ok)]);
        transport.script_node(NODE_C, [Ok(Status::Busy)]);

        let ids = TransactionIdGenerator::new(ManualClock::new(Timestamp::new(1_700_000_000, 0)));
        let client = Client::new(three_node_pool(), transport.clone())
            .with_operator(PAYER, Arc::new(PrivateKey::generate_ed25519()))
            .with_id_source(Arc::new(ids))
            .with_retry_policy(RetryPolicy {
                initial_backoff: Duration::from_millis(50),
                ..policy(10)
            });

        let envelope = client
            .freeze_with_operator(b"transfer 10 to 0.0.1001".to_vec(), "rent")
            .unwrap();
        let id = envelope.transaction_id();
        assert_eq!(id.payer(), PAYER);

        let response = client.execute(&envelope).await.unwrap();
        assert_eq!(response.node_account_id, NODE_B);
        assert_eq!(response.transaction_id, id);

        let submissions = transport.nodes_called(RequestKind::Transaction);
        assert!(submissions.len() <= 3);
        assert_eq!(submissions.last(), Some(&NODE_B));
        let bytes = transport.submitted_bytes();
        assert!(bytes.windows(2).all(|pair| pair[0] == pair[1]));

        transport.script_receipts(
            id,
            [
                Ok(QueryAnswer::ok(TransactionReceipt::with_status(id, Status::Unknown))),
                Ok(QueryAnswer::rejected(Status::ReceiptNotFound)),
                Ok(QueryAnswer::ok(TransactionReceipt::with_status(id, Status::Success))),
            ],
        );
        let receipt = client.get_receipt(id).await.unwrap();
        assert_eq!(receipt.status, Status::Success);
        assert_eq!(transport.nodes_called(RequestKind::Receipt).len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_and_wait_reports_failed_receipt() {
        let transport = Arc::new(ScriptedTransport::new());
        let client = Client::new(three_node_pool(), transport.clone())
            .with_operator(PAYER, Arc::new(PrivateKey::generate_ecdsa()))
            .with_retry_policy(policy(10));
        let envelope = client.freeze_with_operator(Vec::new(), "").unwrap();
        let id = envelope.transaction_id();
        transport.script_receipts(
            id,
            [Ok(QueryAnswer::ok(TransactionReceipt::with_status(
                id,
                Status::InsufficientPayerBalance,
            )))],
        );

        let err = client.execute_and_wait(&envelope).await.unwrap_err();
        match err {
            ClientError::Execution(ExecutionError::ReceiptStatus { receipt }) => {
                assert_eq!(receipt.status, Status::InsufficientPayerBalance);
                assert_eq!(receipt.transaction_id, id);
            }
            other => panic!("expected ReceiptStatus, got {other:?}"),
        }
    }

    // =========================================================================
    // ENGINE PROPERTIES
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_busy_busy_ok_takes_three_attempts() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.script_node(NODE_A, [Ok(Status::Busy), Ok(Status::Busy), Ok(Status::Ok)]);
        let engine = ExecutionEngine::new(single_node_pool(), transport.clone());
        let envelope = signed_envelope(&PrivateKey::generate_ed25519());

        let response = engine.submit(&envelope, &policy(3)).await.unwrap();
        assert_eq!(response.node_account_id, NODE_A);
        assert_eq!(transport.nodes_called(RequestKind::Transaction).len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_busy_times_out() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.script_node(NODE_A, [Ok(Status::Busy)]);
        let engine = ExecutionEngine::new(single_node_pool(), transport.clone());
        let envelope = signed_envelope(&PrivateKey::generate_ed25519());

        let err = engine.submit(&envelope, &policy(3)).await.unwrap_err();
        assert_eq!(
            err,
            ExecutionError::Timeout {
                reason: TimeoutReason::MaxAttempts,
                attempts: 3,
                last_status: Some(Status::Busy),
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_precheck_is_immediate() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.script_node(NODE_A, [Ok(Status::InvalidAccountId)]);
        let engine = ExecutionEngine::new(single_node_pool(), transport.clone());
        let envelope = signed_envelope(&PrivateKey::generate_ed25519());

        let err = engine.submit(&envelope, &policy(3)).await.unwrap_err();
        assert_eq!(
            err,
            ExecutionError::Precheck {
                status: Status::InvalidAccountId,
                transaction_id: envelope.transaction_id(),
            }
        );
        assert_eq!(transport.nodes_called(RequestKind::Transaction).len(), 1);
    }

    // =========================================================================
    // ENVELOPE HAND-OFF
    // =========================================================================

    /// Freeze on one side, co-sign on the other, submit the result.
    #[tokio::test(start_paused = true)]
    async fn test_wire_hand_off_then_cosign() {
        let payer_key = PrivateKey::generate_ed25519();
        let cosigner = PrivateKey::generate_ecdsa();
        let envelope = signed_envelope(&payer_key);

        let mut received = SigningEnvelope::from_wire(&envelope.to_wire().unwrap()).unwrap();
        received.sign(&cosigner).unwrap();
        assert_eq!(received.transaction_id(), envelope.transaction_id());
        assert_eq!(received.body_bytes(), envelope.body_bytes());
        assert_eq!(received.signatures().len(), 2);
        assert!(received.verify_signatures().is_ok());
        assert_eq!(
            received.signatures()[1].public_key,
            cosigner.public_key_bytes()
        );

        let transport = Arc::new(ScriptedTransport::new());
        let engine = ExecutionEngine::new(three_node_pool(), transport.clone());
        engine.submit(&received, &policy(3)).await.unwrap();
        assert_eq!(transport.submitted_bytes(), vec![received.to_wire().unwrap()]);
    }

    // =========================================================================
    // ID GENERATION UNDER CONCURRENCY
    // =========================================================================

    #[test]
    fn test_concurrent_ids_never_repeat() {
        let generator = Arc::new(TransactionIdGenerator::new(ManualClock::new(
            Timestamp::new(1_700_000_000, 0),
        )));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let generator = generator.clone();
                std::thread::spawn(move || {
                    (0..200)
                        .map(|_| generator.next(PAYER).valid_start())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            let starts = handle.join().unwrap();
            assert!(starts.windows(2).all(|pair| pair[0] < pair[1]));
            all.extend(starts);
        }
        assert_eq!(all.len(), 8 * 200);
    }
}
