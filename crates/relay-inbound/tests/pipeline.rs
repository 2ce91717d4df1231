//! End-to-end pipeline tests: relay signs, transport carries canonical bytes,
//! the receiving side reconstructs, validates and hands off to the kernel.

use std::sync::Arc;

use relay_inbound::{
    sign_bytes, Gate, GateConfig, GateError, InboundBatch, MemoryInbox, Submitter,
    ValidationError,
};
use relay_inbound_testkit::{all_vectors, batch_from_vector, multi_relay_fixtures, RelayFixture};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn new_gate() -> Gate<MemoryInbox> {
    init_tracing();
    Gate::new(MemoryInbox::new(), GateConfig::default())
}

fn relay() -> RelayFixture {
    RelayFixture::with_seed([0x42; 32], "chain-a")
}

async fn expect_validation(batch: InboundBatch) -> ValidationError {
    let gate = new_gate();
    let err = gate.ingest(batch).await.unwrap_err();
    assert!(gate.inbox().is_empty().await, "rejected batch reached the kernel");
    match err {
        GateError::Validation(e) => e,
        other => panic!("expected validation error, got {other}"),
    }
}

#[tokio::test]
async fn scenario_valid_single_message() -> anyhow::Result<()> {
    let gate = new_gate();
    let relay = relay();
    let batch = relay.batch(&[("hello", 0)], 0);

    let signed = relay.sign(&batch);
    let received = signed.open().expect("signature should verify");
    let id = gate.ingest(received).await?;

    let accepted = gate.inbox().accepted().await;
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].peer().as_str(), "chain-a");
    assert_eq!(accepted[0].messages()[0].payload, "hello");
    assert_eq!(accepted[0].messages()[0].seq, 0);
    assert_eq!(accepted[0].ack(), 0);
    assert_eq!(id, batch.compute_id());
    Ok(())
}

#[tokio::test]
async fn scenario_length_mismatch() {
    let mut batch = relay().batch(&[("a", 0), ("b", 1)], 0);
    batch.nums = Some(vec![0]);

    assert_eq!(
        expect_validation(batch).await,
        ValidationError::LengthMismatch { messages: 2, nums: 1 }
    );
}

#[tokio::test]
async fn scenario_empty_message() {
    let batch = relay().batch(&[("", 0)], 0);
    assert_eq!(
        expect_validation(batch).await,
        ValidationError::EmptyMessage { index: 0 }
    );
}

#[tokio::test]
async fn scenario_negative_sequence() {
    let batch = relay().batch(&[("hello", -1)], 0);
    assert_eq!(
        expect_validation(batch).await,
        ValidationError::NegativeSequence { index: 0, num: -1 }
    );
}

#[tokio::test]
async fn scenario_negative_ack() {
    let batch = relay().batch(&[("hello", 0)], -5);
    assert_eq!(expect_validation(batch).await, ValidationError::NegativeAck(-5));
}

#[tokio::test]
async fn scenario_empty_submitter_checked_first() {
    let mut batch = relay().batch(&[("hello", 0)], 0);
    batch.submitter = Submitter::empty();
    assert_eq!(expect_validation(batch).await, ValidationError::InvalidSubmitter);
}

#[tokio::test]
async fn signed_ack_only_batch_ingests() -> anyhow::Result<()> {
    let gate = new_gate();
    let relay = relay();
    let batch = relay.ack_only(7);

    // The transported bytes are what the gate decodes.
    let signed = relay.sign(&batch);
    assert!(signed.open().is_some());
    let id = gate.ingest_encoded(&signed.bytes).await?;

    assert_eq!(id, batch.compute_id());
    let accepted = gate.inbox().accepted().await;
    assert!(accepted[0].is_empty());
    assert_eq!(accepted[0].ack(), 7);
    Ok(())
}

#[tokio::test]
async fn sign_bytes_identical_on_both_sides() {
    let relay = relay();
    let batch = relay.batch(&[("first", 1), ("second", 2)], 0);
    let signed = relay.sign(&batch);
    let received = signed.open().unwrap();

    assert_eq!(sign_bytes(&received), sign_bytes(&batch));
}

#[tokio::test]
async fn golden_vectors_through_gate() {
    let gate = Gate::new(MemoryInbox::new(), GateConfig::default());

    for vector in all_vectors() {
        let bytes = hex::decode(vector.expected_canonical).unwrap();
        let result = gate.ingest_encoded(&bytes).await;

        if vector.name == "negative values" {
            assert!(matches!(
                result,
                Err(GateError::Validation(ValidationError::NegativeSequence { .. }))
            ));
        } else {
            let id = result.unwrap();
            assert_eq!(id, batch_from_vector(&vector).compute_id(), "{}", vector.name);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_ingest_from_many_relays() {
    let gate = Arc::new(new_gate());
    let relays = multi_relay_fixtures(8);

    let mut handles = Vec::new();
    for relay in relays {
        let gate = Arc::clone(&gate);
        handles.push(tokio::spawn(async move {
            for seq in 0..10i64 {
                let batch = relay.batch(&[("payload", seq)], seq);
                let received = relay.sign(&batch).open().unwrap();
                gate.ingest(received).await.unwrap();
            }
            // One malformed batch per relay; must not disturb the others.
            let bad = relay.batch(&[("payload", -1)], 0);
            assert!(gate.ingest(bad).await.is_err());
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let accepted = gate.inbox().accepted().await;
    assert_eq!(accepted.len(), 80);

    // Within each peer, arrival order is preserved.
    for i in 0..8 {
        let peer = format!("chain-{}", i);
        let seqs: Vec<u64> = accepted
            .iter()
            .filter(|b| b.peer().as_str() == peer)
            .map(|b| b.messages()[0].seq)
            .collect();
        assert_eq!(seqs, (0..10).collect::<Vec<u64>>());
    }
}

mod properties {
    use proptest::prelude::*;
    use relay_inbound::{validate_batch, Gate, GateConfig, GateError, MemoryInbox};
    use relay_inbound_testkit::{any_batch, single_violation};

    proptest! {
        #[test]
        fn gate_check_agrees_with_validator(batch in any_batch()) {
            let gate = Gate::new(MemoryInbox::new(), GateConfig::unlimited());
            match (gate.check(batch.clone()), validate_batch(&batch)) {
                (Ok(validated), Ok(())) => {
                    prop_assert_eq!(validated.to_inbound().compute_id(), batch.compute_id());
                }
                (Err(GateError::Validation(a)), Err(b)) => prop_assert_eq!(a, b),
                (gate, validator) => {
                    prop_assert!(false, "gate {:?} vs validator {:?}", gate.err(), validator);
                }
            }
        }

        #[test]
        fn limits_never_mask_structural_errors((batch, expected) in single_violation()) {
            let gate = Gate::new(
                MemoryInbox::new(),
                GateConfig { max_messages: 1, max_payload_bytes: 1 },
            );
            match gate.check(batch) {
                Err(GateError::Validation(e)) => prop_assert_eq!(e, expected),
                other => prop_assert!(false, "unexpected {:?}", other.err()),
            }
        }
    }
}
