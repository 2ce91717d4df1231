//! Inbound batch: one signed delivery unit from a relay.
//!
//! A batch carries an ordered list of opaque messages, a parallel list of
//! per-message sequence numbers, and an acknowledgment. It is built once per
//! delivery attempt and never edited afterwards; a corrected delivery is a
//! new batch.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_bytes;
use crate::error::CoreError;
use crate::types::{BatchId, Peer, Submitter};

/// Routing key of the module that consumes inbound batches.
pub const ROUTE: &str = "swingset";

/// Action name of an inbound delivery.
pub const MSG_TYPE: &str = "deliver";

/// The message/sequence container produced by the relay.
///
/// `messages` and `nums` stay `None` when the upstream decoder saw them
/// absent or `null`. That distinction is erased only by the canonical
/// encoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContainer {
    #[serde(default)]
    pub messages: Option<Vec<String>>,
    #[serde(default)]
    pub nums: Option<Vec<i64>>,
    #[serde(default)]
    pub ack: i64,
}

impl MessageContainer {
    /// Parse a relay payload body from JSON.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json).map_err(|e| CoreError::DecodingError(e.to_string()))
    }
}

/// A batch of relayed messages as received, before validation.
///
/// Fields mirror the wire shape verbatim, including out-of-range values, so
/// the validator can report exactly what was wrong.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundBatch {
    /// Origin chain or relay identifier.
    pub peer: Peer,

    /// Opaque message payloads, in delivery order.
    #[serde(default)]
    pub messages: Option<Vec<String>>,

    /// Sequence number for each message, by position.
    #[serde(default)]
    pub nums: Option<Vec<i64>>,

    /// Highest sequence number the sender has already processed.
    pub ack: i64,

    /// Signer of the enclosing transaction.
    pub submitter: Submitter,
}

impl InboundBatch {
    /// Assemble a batch from a relay container and a submitter.
    ///
    /// Copies the container verbatim. Never fails; validation is separate.
    pub fn build(peer: impl Into<Peer>, container: MessageContainer, submitter: Submitter) -> Self {
        Self {
            peer: peer.into(),
            messages: container.messages,
            nums: container.nums,
            ack: container.ack,
            submitter,
        }
    }

    /// Decode a relay JSON container and assemble a batch from it.
    pub fn from_relay_json(
        peer: impl Into<Peer>,
        json: &str,
        submitter: Submitter,
    ) -> Result<Self, CoreError> {
        let container = MessageContainer::from_json(json)?;
        Ok(Self::build(peer, container, submitter))
    }

    /// Start a builder for a batch from `peer`.
    pub fn builder(peer: impl Into<Peer>) -> BatchBuilder {
        BatchBuilder::new(peer)
    }

    /// Messages in delivery order (absent reads as empty).
    pub fn messages(&self) -> &[String] {
        self.messages.as_deref().unwrap_or_default()
    }

    /// Sequence numbers in delivery order (absent reads as empty).
    pub fn nums(&self) -> &[i64] {
        self.nums.as_deref().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.messages().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages().is_empty()
    }

    /// Routing key for this message type.
    pub fn route(&self) -> &'static str {
        ROUTE
    }

    /// Action name for this message type.
    pub fn msg_type(&self) -> &'static str {
        MSG_TYPE
    }

    /// Accounts whose signature the transaction layer must check.
    pub fn signers(&self) -> Vec<&Submitter> {
        vec![&self.submitter]
    }

    /// Content-address of this batch.
    pub fn compute_id(&self) -> BatchId {
        BatchId::hash(&canonical_bytes(self))
    }
}

/// Builder for batches assembled message by message.
///
/// Each message is pushed together with its sequence number, so batches built
/// this way always have matching lengths.
#[derive(Debug, Clone)]
pub struct BatchBuilder {
    peer: Peer,
    messages: Vec<String>,
    nums: Vec<i64>,
    ack: i64,
    submitter: Submitter,
}

impl BatchBuilder {
    /// Start building a batch.
    pub fn new(peer: impl Into<Peer>) -> Self {
        Self {
            peer: peer.into(),
            messages: Vec::new(),
            nums: Vec::new(),
            ack: 0,
            submitter: Submitter::empty(),
        }
    }

    /// Append a message with its sequence number.
    pub fn message(mut self, payload: impl Into<String>, num: i64) -> Self {
        self.messages.push(payload.into());
        self.nums.push(num);
        self
    }

    /// Set the acknowledgment.
    pub fn ack(mut self, ack: i64) -> Self {
        self.ack = ack;
        self
    }

    /// Set the submitter.
    pub fn submitter(mut self, submitter: Submitter) -> Self {
        self.submitter = submitter;
        self
    }

    pub fn build(self) -> InboundBatch {
        InboundBatch {
            peer: self.peer,
            messages: Some(self.messages),
            nums: Some(self.nums),
            ack: self.ack,
            submitter: self.submitter,
        }
    }
}

/// One relayed message paired with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InboundMessage {
    pub payload: String,
    pub seq: u64,
}

/// A batch that passed structural validation.
///
/// Only obtainable through `TryFrom<InboundBatch>`, which runs the validator.
/// Messages are held as `(payload, seq)` records and the sequence numbers
/// and ack are unsigned, so none of the structural violations can be
/// expressed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBatch {
    pub(crate) peer: Peer,
    pub(crate) messages: Vec<InboundMessage>,
    pub(crate) ack: u64,
    pub(crate) submitter: Submitter,
}

impl ValidatedBatch {
    pub fn peer(&self) -> &Peer {
        &self.peer
    }

    pub fn messages(&self) -> &[InboundMessage] {
        &self.messages
    }

    pub fn ack(&self) -> u64 {
        self.ack
    }

    pub fn submitter(&self) -> &Submitter {
        &self.submitter
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Summed length of all message payloads, in bytes.
    pub fn payload_bytes(&self) -> usize {
        self.messages.iter().map(|m| m.payload.len()).sum()
    }

    /// Convert back to the wire shape.
    ///
    /// The result encodes to the same canonical bytes as the batch that was
    /// validated.
    pub fn to_inbound(&self) -> InboundBatch {
        let (messages, nums) = self
            .messages
            .iter()
            .map(|m| (m.payload.clone(), m.seq as i64))
            .unzip();

        InboundBatch {
            peer: self.peer.clone(),
            messages: Some(messages),
            nums: Some(nums),
            ack: self.ack as i64,
            submitter: self.submitter.clone(),
        }
    }

    /// Content-address of this batch.
    pub fn compute_id(&self) -> BatchId {
        self.to_inbound().compute_id()
    }

    /// Split into `(peer, messages, ack, submitter)`.
    pub fn into_parts(self) -> (Peer, Vec<InboundMessage>, u64, Submitter) {
        (self.peer, self.messages, self.ack, self.submitter)
    }
}
