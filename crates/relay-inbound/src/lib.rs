//! # Relay Inbound
//!
//! The ingestion gate between an external relay and the deterministic
//! execution kernel.
//!
//! ## Overview
//!
//! A relay delivers batches of opaque messages, each tagged with a
//! per-peer sequence number, plus an acknowledgment. Before anything reaches
//! the kernel the gate:
//!
//! - **Reconstructs** the batch from its canonical bytes or relay container
//! - **Validates** its structure in a fixed, fail-fast order
//! - **Encodes** it canonically to derive its [`BatchId`]
//! - **Hands off** the validated batch to a [`KernelInbox`]
//!
//! Signature verification and cross-batch ordering belong to the layers on
//! either side of the gate.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use relay_inbound::{Gate, GateConfig, MemoryInbox, Submitter};
//!
//! async fn example() {
//!     let gate = Gate::new(MemoryInbox::new(), GateConfig::default());
//!
//!     let id = gate
//!         .ingest_relay_json(
//!             "chain-a",
//!             r#"{"messages": ["hello"], "nums": [0], "ack": 0}"#,
//!             Submitter::from_bytes(vec![0x42; 20]),
//!         )
//!         .await
//!         .unwrap();
//!
//!     println!("accepted {}", id);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `relay_inbound::core` - Batch primitives, validator, canonical encoding

pub mod error;
pub mod gate;
pub mod inbox;

// Re-export component crates
pub use relay_inbound_core as core;

// Re-export main types for convenience
pub use error::{GateError, Result};
pub use gate::{Gate, GateConfig};
pub use inbox::{InboxRejection, KernelInbox, MemoryInbox};

// Re-export commonly used core types
pub use relay_inbound_core::{
    canonical_bytes, decode_batch, sign_bytes, validate_batch, BatchId, InboundBatch,
    InboundMessage, MessageContainer, Peer, Submitter, ValidatedBatch, ValidationError,
};
