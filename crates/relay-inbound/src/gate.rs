//! The Gate: validated handoff of relayed batches to the kernel.
//!
//! The Gate runs the fixed pipeline for a received batch: reconstruct,
//! validate, encode, hand off. Validation and encoding are synchronous; only
//! the handoff awaits.

use std::sync::Arc;

use relay_inbound_core::{
    decode_batch, BatchId, InboundBatch, MessageContainer, Peer, Submitter, ValidatedBatch,
};

use crate::error::{GateError, Result};
use crate::inbox::KernelInbox;

/// Configuration for the Gate.
///
/// Limits are checked after structural validation, so they never change
/// which structural error a malformed batch reports. A limit of `0` is
/// disabled.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Maximum number of messages in one batch.
    pub max_messages: usize,
    /// Maximum summed length of all message payloads, in bytes.
    pub max_payload_bytes: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_messages: 1000,
            max_payload_bytes: 1024 * 1024,
        }
    }
}

impl GateConfig {
    /// A config with no size limits.
    pub fn unlimited() -> Self {
        Self {
            max_messages: 0,
            max_payload_bytes: 0,
        }
    }
}

/// The ingestion gate.
///
/// Stateless apart from the injected inbox; safe to share across tasks.
pub struct Gate<I: KernelInbox> {
    /// Where accepted batches go.
    inbox: Arc<I>,
    /// Configuration.
    config: GateConfig,
}

impl<I: KernelInbox> Gate<I> {
    /// Create a new gate.
    pub fn new(inbox: I, config: GateConfig) -> Self {
        Self {
            inbox: Arc::new(inbox),
            config,
        }
    }

    /// Get the inbox reference.
    pub fn inbox(&self) -> &I {
        &self.inbox
    }

    /// Get the configuration.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Checks
    // ─────────────────────────────────────────────────────────────────────────

    /// Validate a batch and apply the configured limits.
    ///
    /// No side effects; nothing is handed to the kernel.
    pub fn check(&self, batch: InboundBatch) -> Result<ValidatedBatch> {
        let validated = ValidatedBatch::try_from(batch)?;

        let count = validated.len();
        if self.config.max_messages > 0 && count > self.config.max_messages {
            return Err(GateError::TooManyMessages {
                count,
                limit: self.config.max_messages,
            });
        }

        let bytes = validated.payload_bytes();
        if self.config.max_payload_bytes > 0 && bytes > self.config.max_payload_bytes {
            return Err(GateError::PayloadTooLarge {
                bytes,
                limit: self.config.max_payload_bytes,
            });
        }

        Ok(validated)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Ingest Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Ingest a reconstructed batch.
    ///
    /// Returns the batch id once the kernel inbox has taken the batch. Any
    /// error means the batch was refused whole.
    pub async fn ingest(&self, batch: InboundBatch) -> Result<BatchId> {
        let peer = batch.peer.clone();

        let validated = match self.check(batch) {
            Ok(validated) => validated,
            Err(e) => {
                tracing::warn!("Rejected batch from {}: {}", peer, e);
                return Err(e);
            }
        };

        let id = validated.compute_id();

        if let Err(rejection) = self.inbox.accept(&validated).await {
            tracing::warn!(%peer, %id, "Kernel refused batch: {}", rejection);
            return Err(GateError::Rejected {
                id,
                reason: rejection.reason,
            });
        }

        tracing::debug!(
            %peer,
            %id,
            messages = validated.len(),
            ack = validated.ack(),
            "Batch handed to kernel"
        );
        Ok(id)
    }

    /// Ingest a batch from its canonical bytes.
    pub async fn ingest_encoded(&self, bytes: &[u8]) -> Result<BatchId> {
        let batch = decode_batch(bytes).map_err(|e| {
            tracing::warn!("Undecodable batch ({} bytes): {}", bytes.len(), e);
            GateError::from(e)
        })?;
        self.ingest(batch).await
    }

    /// Build a batch from a relay container and ingest it.
    pub async fn ingest_container(
        &self,
        peer: impl Into<Peer>,
        container: MessageContainer,
        submitter: Submitter,
    ) -> Result<BatchId> {
        self.ingest(InboundBatch::build(peer, container, submitter))
            .await
    }

    /// Build a batch from a relay JSON container and ingest it.
    pub async fn ingest_relay_json(
        &self,
        peer: impl Into<Peer>,
        json: &str,
        submitter: Submitter,
    ) -> Result<BatchId> {
        let batch = InboundBatch::from_relay_json(peer, json, submitter)?;
        self.ingest(batch).await
    }
}
