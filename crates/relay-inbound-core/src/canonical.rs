//! Canonical CBOR encoding for deterministic batch serialization.
//!
//! Batches are encoded as CBOR (RFC 8949) with deterministic rules:
//! - One map with text keys, sorted by CBOR-encoded bytes
//! - Integers: smallest valid encoding
//! - Lengths: definite only
//! - messages/nums: always present (empty array if absent)
//!
//! The same bytes are produced when a relay signs a batch and when the
//! transaction layer verifies it. Changes to this encoding invalidate every
//! signature ever made over a batch.

use ciborium::value::Value;

use crate::batch::InboundBatch;
use crate::error::CoreError;
use crate::types::{Peer, Submitter};

/// Domain separation prefix for signing.
pub const SIGN_DOMAIN: &[u8] = b"relay-inbound/deliver/v1\0";

/// CBOR map key names.
mod keys {
    pub const ACK: &str = "ack";
    pub const MESSAGES: &str = "messages";
    pub const NUMS: &str = "nums";
    pub const PEER: &str = "peer";
    pub const SUBMITTER: &str = "submitter";
}

/// Encode a batch to canonical CBOR bytes.
///
/// Encoded key order: ack, nums, peer, messages, submitter.
pub fn canonical_bytes(batch: &InboundBatch) -> Vec<u8> {
    let value = batch_to_cbor_value(batch);
    encode_cbor_canonical(&value)
}

/// Build the message a submitter signs (with domain separation).
pub fn sign_bytes(batch: &InboundBatch) -> Vec<u8> {
    let canonical = canonical_bytes(batch);
    let mut msg = Vec::with_capacity(SIGN_DOMAIN.len() + canonical.len());
    msg.extend_from_slice(SIGN_DOMAIN);
    msg.extend_from_slice(&canonical);
    msg
}

/// Replace absent message and sequence lists with explicit empty ones.
///
/// Upstream decoders may hand us `None` where the sender had `[]`; both must
/// sign identically.
fn normalize_lists(batch: &InboundBatch) -> (&[String], &[i64]) {
    let messages = match &batch.messages {
        Some(messages) => messages.as_slice(),
        None => &[],
    };
    let nums = match &batch.nums {
        Some(nums) => nums.as_slice(),
        None => &[],
    };
    (messages, nums)
}

/// Convert a batch to a CBOR Value (map with text keys).
fn batch_to_cbor_value(batch: &InboundBatch) -> Value {
    let (messages, nums) = normalize_lists(batch);

    // Insertion order is irrelevant; encode_map sorts.
    Value::Map(vec![
        (
            Value::Text(keys::PEER.to_string()),
            Value::Text(batch.peer.as_str().to_string()),
        ),
        (
            Value::Text(keys::MESSAGES.to_string()),
            Value::Array(messages.iter().map(|m| Value::Text(m.clone())).collect()),
        ),
        (
            Value::Text(keys::NUMS.to_string()),
            Value::Array(nums.iter().map(|n| Value::Integer((*n).into())).collect()),
        ),
        (
            Value::Text(keys::ACK.to_string()),
            Value::Integer(batch.ack.into()),
        ),
        (
            Value::Text(keys::SUBMITTER.to_string()),
            Value::Bytes(batch.submitter.as_bytes().to_vec()),
        ),
    ])
}

/// Reconstruct a batch from canonical CBOR bytes.
///
/// Rejects input that parses but is not byte-for-byte what
/// [`canonical_bytes`] would produce (unsorted keys, wide integers,
/// trailing bytes).
pub fn decode_batch(bytes: &[u8]) -> Result<InboundBatch, CoreError> {
    let value: Value =
        ciborium::from_reader(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))?;

    let batch = cbor_value_to_batch(&value)?;

    if canonical_bytes(&batch) != bytes {
        return Err(CoreError::NonCanonical);
    }

    Ok(batch)
}

/// Convert a CBOR Value (map) back to a batch.
fn cbor_value_to_batch(value: &Value) -> Result<InboundBatch, CoreError> {
    let map = match value {
        Value::Map(m) => m,
        _ => return Err(CoreError::MalformedBatch("expected map".into())),
    };

    let get = |key: &str| -> Option<&Value> {
        map.iter()
            .find(|(k, _)| matches!(k, Value::Text(s) if s == key))
            .map(|(_, v)| v)
    };

    let peer = match get(keys::PEER) {
        Some(Value::Text(s)) => Peer::new(s.clone()),
        _ => return Err(CoreError::MalformedBatch("invalid peer".into())),
    };

    let messages = match get(keys::MESSAGES) {
        Some(Value::Array(arr)) => {
            let mut messages = Vec::with_capacity(arr.len());
            for item in arr {
                match item {
                    Value::Text(s) => messages.push(s.clone()),
                    _ => return Err(CoreError::MalformedBatch("invalid message".into())),
                }
            }
            messages
        }
        _ => return Err(CoreError::MalformedBatch("missing or invalid messages".into())),
    };

    let nums = match get(keys::NUMS) {
        Some(Value::Array(arr)) => {
            let mut nums = Vec::with_capacity(arr.len());
            for item in arr {
                nums.push(integer_field(item, "num")?);
            }
            nums
        }
        _ => return Err(CoreError::MalformedBatch("missing or invalid nums".into())),
    };

    let ack = match get(keys::ACK) {
        Some(v) => integer_field(v, "ack")?,
        None => return Err(CoreError::MalformedBatch("missing ack".into())),
    };

    let submitter = match get(keys::SUBMITTER) {
        Some(Value::Bytes(b)) => Submitter::from_bytes(b.clone()),
        _ => return Err(CoreError::MalformedBatch("invalid submitter".into())),
    };

    Ok(InboundBatch {
        peer,
        messages: Some(messages),
        nums: Some(nums),
        ack,
        submitter,
    })
}

fn integer_field(value: &Value, name: &str) -> Result<i64, CoreError> {
    match value {
        Value::Integer(i) => i64::try_from(*i)
            .map_err(|_| CoreError::MalformedBatch(format!("{} out of range", name))),
        _ => Err(CoreError::MalformedBatch(format!("invalid {}", name))),
    }
}

/// Encode a CBOR value to canonical bytes.
fn encode_cbor_canonical(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_value(&mut buf, value);
    buf
}

/// Recursively encode a CBOR value.
fn encode_value(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Bytes(b) => encode_bytes(buf, b),
        Value::Text(s) => encode_text(buf, s),
        Value::Array(arr) => encode_array(buf, arr),
        Value::Map(entries) => encode_map(buf, entries),
        Value::Bool(b) => buf.push(if *b { 0xf5 } else { 0xf4 }),
        Value::Null => buf.push(0xf6),
        _ => panic!("unsupported CBOR value type"),
    }
}

fn encode_integer(buf: &mut Vec<u8>, i: ciborium::value::Integer) {
    let n: i128 = i.into();
    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // -1 encodes as 0, -2 as 1, ...
        encode_uint(buf, 1, (-1 - n) as u64);
    }
}

fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffffffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

fn encode_array(buf: &mut Vec<u8>, arr: &[Value]) {
    encode_uint(buf, 4, arr.len() as u64);
    for item in arr {
        encode_value(buf, item);
    }
}

fn encode_map(buf: &mut Vec<u8>, entries: &[(Value, Value)]) {
    // RFC 8949 canonical: sort keys by CBOR-encoded bytes
    let mut sorted: Vec<_> = entries
        .iter()
        .map(|(k, v)| {
            let mut key_bytes = Vec::new();
            encode_value(&mut key_bytes, k);
            (key_bytes, v)
        })
        .collect();

    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, sorted.len() as u64);
    for (key_bytes, v) in sorted {
        buf.extend_from_slice(&key_bytes);
        encode_value(buf, v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::MessageContainer;

    fn make_batch() -> InboundBatch {
        InboundBatch::builder("chain-a")
            .message("hello", 0)
            .ack(0)
            .submitter(Submitter::from_bytes(vec![0x42; 20]))
            .build()
    }

    fn map_keys(bytes: &[u8]) -> Vec<String> {
        let value: Value = ciborium::from_reader(bytes).unwrap();
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .filter_map(|(k, _)| match k {
                    Value::Text(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => panic!("expected map"),
        }
    }

    #[test]
    fn test_canonical_deterministic() {
        let batch = make_batch();
        assert_eq!(canonical_bytes(&batch), canonical_bytes(&batch.clone()));
    }

    #[test]
    fn test_known_bytes() {
        let expected = "a56361636b00646e756d738100647065657267636861696e2d61686d65737361676573\
                        816568656c6c6f697375626d6974746572544242424242424242424242424242424242424242";
        assert_eq!(hex::encode(canonical_bytes(&make_batch())), expected);
    }

    #[test]
    fn test_key_ordering() {
        // Sorted by encoded bytes, length prefix first:
        // 0x63 "ack" < 0x64 "nums" < 0x64 "peer" < 0x68 "messages" < 0x69 "submitter"
        let keys = map_keys(&canonical_bytes(&make_batch()));
        assert_eq!(keys, vec!["ack", "nums", "peer", "messages", "submitter"]);
    }

    #[test]
    fn test_absent_and_empty_encode_identically() {
        let submitter = Submitter::from_bytes(vec![0x42; 20]);
        let absent = InboundBatch::build("chain-a", MessageContainer::default(), submitter.clone());
        let empty = InboundBatch::build(
            "chain-a",
            MessageContainer {
                messages: Some(vec![]),
                nums: Some(vec![]),
                ack: 0,
            },
            submitter,
        );

        assert_ne!(absent, empty);
        assert_eq!(canonical_bytes(&absent), canonical_bytes(&empty));
        assert_eq!(sign_bytes(&absent), sign_bytes(&empty));
        assert_eq!(absent.compute_id(), empty.compute_id());
    }

    #[test]
    fn test_absent_lists_still_present_in_map() {
        let batch = InboundBatch {
            peer: "chain-a".into(),
            messages: None,
            nums: None,
            ack: 0,
            submitter: Submitter::from_bytes(vec![1]),
        };
        let keys = map_keys(&canonical_bytes(&batch));
        assert!(keys.contains(&"messages".to_string()));
        assert!(keys.contains(&"nums".to_string()));
    }

    #[test]
    fn test_negative_values_encode() {
        let batch = InboundBatch {
            peer: "chain-a".into(),
            messages: Some(vec!["x".into()]),
            nums: Some(vec![-1]),
            ack: -5,
            submitter: Submitter::from_bytes(vec![0x01]),
        };
        let expected = "a56361636b24646e756d738120647065657267636861696e2d61686d65737361676573\
                        816178697375626d69747465724101";
        assert_eq!(hex::encode(canonical_bytes(&batch)), expected);
    }

    #[test]
    fn test_integer_encoding() {
        let mut buf = Vec::new();
        encode_uint(&mut buf, 0, 23);
        assert_eq!(buf, vec![0x17]);

        buf.clear();
        encode_uint(&mut buf, 0, 24);
        assert_eq!(buf, vec![0x18, 24]);

        buf.clear();
        encode_uint(&mut buf, 0, 300);
        assert_eq!(buf, vec![0x19, 0x01, 0x2c]);

        buf.clear();
        encode_integer(&mut buf, (-1i64).into());
        assert_eq!(buf, vec![0x20]);

        buf.clear();
        encode_integer(&mut buf, i64::MIN.into());
        assert_eq!(buf[0], 0x3b);
        assert_eq!(buf.len(), 9);
    }

    #[test]
    fn test_roundtrip() {
        let batch = make_batch();
        let bytes = canonical_bytes(&batch);
        let decoded = decode_batch(&bytes).unwrap();

        assert_eq!(decoded, batch);
        assert_eq!(canonical_bytes(&decoded), bytes);
    }

    #[test]
    fn test_roundtrip_absent_lists() {
        let batch = InboundBatch::build(
            "chain-a",
            MessageContainer::default(),
            Submitter::from_bytes(vec![7; 8]),
        );
        let bytes = canonical_bytes(&batch);
        let decoded = decode_batch(&bytes).unwrap();

        // Reconstruction yields explicit empty lists.
        assert_eq!(decoded.messages, Some(vec![]));
        assert_eq!(canonical_bytes(&decoded), bytes);
    }

    #[test]
    fn test_decode_rejects_unsorted_map() {
        let batch = make_batch();
        let mut bytes = Vec::new();
        ciborium::into_writer(&batch_to_cbor_value(&batch), &mut bytes).unwrap();

        // ciborium keeps insertion order, which starts with "peer".
        assert_ne!(bytes, canonical_bytes(&batch));
        assert!(matches!(decode_batch(&bytes), Err(CoreError::NonCanonical)));
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let mut bytes = canonical_bytes(&make_batch());
        bytes.push(0x00);
        assert!(matches!(decode_batch(&bytes), Err(CoreError::NonCanonical)));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_batch(&[]), Err(CoreError::DecodingError(_))));
        assert!(matches!(decode_batch(&[0x01]), Err(CoreError::MalformedBatch(_))));
    }

    #[test]
    fn test_decode_rejects_wrong_field_type() {
        let value = Value::Map(vec![
            (Value::Text("ack".into()), Value::Integer(0.into())),
            (Value::Text("nums".into()), Value::Array(vec![])),
            (Value::Text("peer".into()), Value::Text("chain-a".into())),
            (
                Value::Text("messages".into()),
                Value::Array(vec![Value::Bytes(vec![1])]),
            ),
            (Value::Text("submitter".into()), Value::Bytes(vec![1])),
        ]);
        let bytes = encode_cbor_canonical(&value);
        assert!(matches!(decode_batch(&bytes), Err(CoreError::MalformedBatch(_))));
    }

    #[test]
    fn test_domain_separation() {
        let batch = make_batch();
        let msg = sign_bytes(&batch);
        assert!(msg.starts_with(SIGN_DOMAIN));
        assert_eq!(&msg[SIGN_DOMAIN.len()..], canonical_bytes(&batch).as_slice());
    }
}
