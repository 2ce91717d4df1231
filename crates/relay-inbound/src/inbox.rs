//! KernelInbox: the handoff point between the gate and the execution kernel.
//!
//! The kernel owns cross-batch ordering by peer and sequence number, so it
//! may still refuse a structurally valid batch (stale ack, gap, duplicate).
//! The gate only guarantees what it hands over is well-formed.

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use relay_inbound_core::{Peer, ValidatedBatch};

/// Refusal returned by the kernel for a well-formed batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct InboxRejection {
    pub reason: String,
}

impl InboxRejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The kernel ingestion interface.
///
/// `accept` receives the peer, the paired messages and sequence numbers, the
/// ack and the submitter, all carried by the validated batch.
#[async_trait]
pub trait KernelInbox: Send + Sync {
    /// Queue a batch for the kernel, or refuse it as a whole.
    async fn accept(&self, batch: &ValidatedBatch) -> Result<(), InboxRejection>;
}

/// In-memory inbox.
///
/// Records accepted batches in arrival order. Primarily for tests and local
/// tooling; it applies no ordering rules of its own.
pub struct MemoryInbox {
    inner: Mutex<MemoryInboxInner>,
}

struct MemoryInboxInner {
    /// Accepted batches, oldest first.
    accepted: Vec<ValidatedBatch>,

    /// Peers whose batches are refused.
    closed_peers: HashSet<Peer>,
}

impl MemoryInbox {
    /// Create a new empty inbox.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryInboxInner {
                accepted: Vec::new(),
                closed_peers: HashSet::new(),
            }),
        }
    }

    /// Refuse every later batch from `peer`.
    pub async fn close_peer(&self, peer: impl Into<Peer>) {
        self.inner.lock().await.closed_peers.insert(peer.into());
    }

    /// Snapshot of accepted batches, oldest first.
    pub async fn accepted(&self) -> Vec<ValidatedBatch> {
        self.inner.lock().await.accepted.clone()
    }

    /// Number of accepted batches.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.accepted.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.accepted.is_empty()
    }
}

impl Default for MemoryInbox {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KernelInbox for MemoryInbox {
    async fn accept(&self, batch: &ValidatedBatch) -> Result<(), InboxRejection> {
        let mut inner = self.inner.lock().await;

        if inner.closed_peers.contains(batch.peer()) {
            return Err(InboxRejection::new(format!("peer {} is closed", batch.peer())));
        }

        inner.accepted.push(batch.clone());
        Ok(())
    }
}
