//! # Relay Inbound Core
//!
//! Pure primitives for batches of relayed messages entering the execution
//! kernel: construction, structural validation, and canonical encoding.
//!
//! This crate contains no I/O, no storage, no networking and no signature
//! verification. It produces the exact bytes a signer signs and a verifier
//! checks, and decides whether a batch is structurally well-formed.
//!
//! ## Key Types
//!
//! - [`InboundBatch`] - A batch as received: peer, messages, nums, ack, submitter
//! - [`MessageContainer`] - The relay's message/sequence payload
//! - [`ValidatedBatch`] - A batch that passed validation, as `(payload, seq)` pairs
//! - [`BatchId`] - Content address (Blake3 of the canonical bytes)
//!
//! ## Pipeline
//!
//! ```rust
//! use relay_inbound_core::{
//!     canonical_bytes, decode_batch, validate_batch, InboundBatch, Submitter,
//! };
//!
//! let submitter = Submitter::from_bytes(vec![0x42; 20]);
//! let batch = InboundBatch::from_relay_json(
//!     "chain-a",
//!     r#"{"messages": ["hello"], "nums": [0], "ack": 0}"#,
//!     submitter,
//! )
//! .unwrap();
//!
//! // Sign time and verify time use the same bytes.
//! let bytes = canonical_bytes(&batch);
//! let received = decode_batch(&bytes).unwrap();
//! assert_eq!(canonical_bytes(&received), bytes);
//!
//! assert!(validate_batch(&received).is_ok());
//! ```
//!
//! ## Canonicalization
//!
//! Batches are encoded using deterministic CBOR. See [`canonical`] module.

pub mod batch;
pub mod canonical;
pub mod error;
pub mod types;
pub mod validation;

pub use batch::{
    BatchBuilder, InboundBatch, InboundMessage, MessageContainer, ValidatedBatch, MSG_TYPE, ROUTE,
};
pub use canonical::{canonical_bytes, decode_batch, sign_bytes, SIGN_DOMAIN};
pub use error::{CoreError, RejectionCategory, ValidationError};
pub use types::{BatchId, Peer, Submitter};
pub use validation::validate_batch;
