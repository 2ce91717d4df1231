//! # Relay Inbound Testkit
//!
//! Testing utilities for relay inbound batches.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known batches with their canonical bytes for cross-implementation checks
//! - **Generators**: Proptest strategies for valid, malformed and single-violation batches
//! - **Fixtures**: Relay identities that sign batches and open them on the receiving side
//!
//! ## Golden Vectors
//!
//! ```rust
//! use relay_inbound_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, hex) in verify_all_vectors() {
//!     assert!(matches, "{}: {}", name, hex);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use relay_inbound_core::validate_batch;
//! use relay_inbound_testkit::generators::single_violation;
//!
//! proptest! {
//!     #[test]
//!     fn reports_the_broken_invariant((batch, expected) in single_violation()) {
//!         prop_assert_eq!(validate_batch(&batch), Err(expected));
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use relay_inbound_testkit::fixtures::RelayFixture;
//!
//! let relay = RelayFixture::new("chain-a");
//! let batch = relay.batch(&[("hello", 0)], 0);
//! let signed = relay.sign(&batch);
//! assert_eq!(signed.open(), Some(batch));
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_relay_fixtures, RelayFixture, SignedBatch};
pub use generators::{any_batch, batch_from_params, single_violation, BatchParams};
pub use vectors::{all_vectors, batch_from_vector, verify_all_vectors, GoldenVector};
