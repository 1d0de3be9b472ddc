//! # Ledger Client Benchmarks
//!
//! | Subsystem | Operation | Hot path |
//! |-----------|-----------|----------|
//! | LC-01 | id generation | one per transaction, behind a mutex |
//! | LC-02 | freeze + sign | one per transaction per key |
//! | LC-05 | running hash | one per streamed topic message |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lc_01_transaction_id::{ManualClock, TransactionIdGenerator};
use lc_02_signing_envelope::{SigningEnvelope, TransactionBody};
use lc_05_topic_subscription::ConsensusTopicRunningHash;
use shared_crypto::PrivateKey;
use shared_types::{AccountId, Timestamp, TopicId};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// LC-05: Running hash
// ============================================================================

fn bench_running_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("lc-05-running-hash");
    let state = ConsensusTopicRunningHash::for_new_topic(TopicId::new(0, 0, 1234));
    let at = Timestamp::new(1_700_000_000, 0);

    for size in [32usize, 1024, 6 * 1024] {
        let message = vec![0xA5u8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("update", size), &message, |b, message| {
            b.iter(|| black_box(state.update(black_box(message), at)))
        });
    }

    group.bench_function("chain_1000", |b| {
        b.iter(|| {
            let mut chain = state;
            for n in 0..1000 {
                chain = chain.update(b"message", at.plus_nanos(n));
            }
            black_box(chain)
        })
    });

    group.finish();
}

// ============================================================================
// LC-01: Transaction id generation
// ============================================================================

fn bench_id_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("lc-01-transaction-id");
    let payer = AccountId::new(0, 0, 2);

    // A frozen clock forces the 1ns bump on every call.
    let frozen = TransactionIdGenerator::new(ManualClock::new(Timestamp::new(1_700_000_000, 0)));
    group.bench_function("next_frozen_clock", |b| b.iter(|| black_box(frozen.next(payer))));

    let system = TransactionIdGenerator::system();
    group.bench_function("next_system_clock", |b| b.iter(|| black_box(system.next(payer))));

    let shared = Arc::new(TransactionIdGenerator::system());
    group.measurement_time(Duration::from_secs(5));
    group.bench_function("next_4_threads", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let shared = shared.clone();
                    std::thread::spawn(move || {
                        for _ in 0..250 {
                            black_box(shared.next(payer));
                        }
                    })
                })
                .collect();
            for handle in handles {
                let _ = handle.join();
            }
        })
    });

    group.finish();
}

// ============================================================================
// LC-02: Freeze and sign
// ============================================================================

fn bench_envelope_signing(c: &mut Criterion) {
    let mut group = c.benchmark_group("lc-02-signing-envelope");
    let ids = TransactionIdGenerator::system();
    let body = TransactionBody::new(ids.next(AccountId::new(0, 0, 2)), vec![7u8; 256]);

    for (name, key) in [
        ("ed25519", PrivateKey::generate_ed25519()),
        ("ecdsa_secp256k1", PrivateKey::generate_ecdsa()),
    ] {
        group.bench_function(BenchmarkId::new("freeze_sign", name), |b| {
            b.iter(|| {
                let mut envelope = SigningEnvelope::new(&body).unwrap();
                envelope.freeze().sign(&key).unwrap();
                black_box(envelope)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_running_hash,
    bench_id_generation,
    bench_envelope_signing,
);

criterion_main!(benches);
