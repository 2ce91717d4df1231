//! Stateless structural validation of inbound batches.
//!
//! Checks run in a fixed order and stop at the first failure, so every
//! implementation reports the same error for the same batch.

use crate::batch::{InboundBatch, InboundMessage, ValidatedBatch};
use crate::error::ValidationError;

/// Validate a batch's structure.
///
/// This performs, in order:
/// - Submitter presence
/// - Peer presence
/// - Messages/nums length equality
/// - Per-slot message presence and sequence sign
/// - Ack sign
///
/// Cross-batch ordering of `nums` and `ack` is not checked here.
pub fn validate_batch(batch: &InboundBatch) -> Result<(), ValidationError> {
    // 1. Submitter
    if batch.submitter.is_empty() {
        return Err(ValidationError::InvalidSubmitter);
    }

    // 2. Peer
    if batch.peer.is_empty() {
        return Err(ValidationError::EmptyPeer);
    }

    // 3. Parallel arrays must line up
    let messages = batch.messages();
    let nums = batch.nums();
    if messages.len() != nums.len() {
        return Err(ValidationError::LengthMismatch {
            messages: messages.len(),
            nums: nums.len(),
        });
    }

    // 4. Each slot: message first, then its sequence number
    for (index, (message, &num)) in messages.iter().zip(nums).enumerate() {
        if message.is_empty() {
            return Err(ValidationError::EmptyMessage { index });
        }
        if num < 0 {
            return Err(ValidationError::NegativeSequence { index, num });
        }
    }

    // 5. Ack
    if batch.ack < 0 {
        return Err(ValidationError::NegativeAck(batch.ack));
    }

    Ok(())
}

impl TryFrom<InboundBatch> for ValidatedBatch {
    type Error = ValidationError;

    fn try_from(batch: InboundBatch) -> Result<Self, Self::Error> {
        validate_batch(&batch)?;

        let messages = batch
            .messages
            .unwrap_or_default()
            .into_iter()
            .zip(batch.nums.unwrap_or_default())
            .map(|(payload, num)| InboundMessage {
                payload,
                seq: num as u64,
            })
            .collect();

        Ok(ValidatedBatch {
            peer: batch.peer,
            messages,
            ack: batch.ack as u64,
            submitter: batch.submitter,
        })
    }
}
