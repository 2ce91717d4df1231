//! Error types for relay inbound batches.

use thiserror::Error;

/// Errors from decoding or parsing a batch.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("decoding error: {0}")]
    DecodingError(String),

    #[error("malformed batch: {0}")]
    MalformedBatch(String),

    #[error("bytes are not in canonical form")]
    NonCanonical,
}

/// Structural violations found by the batch validator.
///
/// Each variant corresponds to exactly one check; the validator reports
/// the first failing check in its fixed order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid submitter: address is empty")]
    InvalidSubmitter,

    #[error("peer cannot be empty")]
    EmptyPeer,

    #[error("messages and nums must be the same length: {messages} messages, {nums} nums")]
    LengthMismatch { messages: usize, nums: usize },

    #[error("message at index {index} is empty")]
    EmptyMessage { index: usize },

    #[error("sequence number at index {index} is negative: {num}")]
    NegativeSequence { index: usize, num: i64 },

    #[error("ack cannot be negative: {0}")]
    NegativeAck(i64),
}

/// Rejection class reported to the enclosing transaction layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionCategory {
    /// The signer address is missing or malformed.
    InvalidAddress,
    /// The request body is structurally unacceptable.
    UnknownRequest,
}

impl ValidationError {
    /// The rejection class the transaction layer surfaces for this error.
    pub fn category(&self) -> RejectionCategory {
        match self {
            ValidationError::InvalidSubmitter => RejectionCategory::InvalidAddress,
            ValidationError::EmptyPeer
            | ValidationError::LengthMismatch { .. }
            | ValidationError::EmptyMessage { .. }
            | ValidationError::NegativeSequence { .. }
            | ValidationError::NegativeAck(_) => RejectionCategory::UnknownRequest,
        }
    }

    /// Slot within the batch the error points at, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            ValidationError::EmptyMessage { index }
            | ValidationError::NegativeSequence { index, .. } => Some(*index),
            _ => None,
        }
    }
}
