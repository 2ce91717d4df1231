//! Error types for the ingestion gate.

use relay_inbound_core::{BatchId, CoreError, ValidationError};
use thiserror::Error;

/// Errors that can occur while ingesting a batch.
///
/// Every variant means the whole batch was refused; nothing from it reached
/// the kernel.
#[derive(Debug, Error)]
pub enum GateError {
    /// Structural validation failed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The batch could not be decoded.
    #[error("decoding error: {0}")]
    Core(#[from] CoreError),

    /// More messages than the configured limit.
    #[error("batch has {count} messages, limit is {limit}")]
    TooManyMessages { count: usize, limit: usize },

    /// Message payloads larger than the configured limit.
    #[error("batch payload is {bytes} bytes, limit is {limit}")]
    PayloadTooLarge { bytes: usize, limit: usize },

    /// The kernel inbox refused the batch.
    #[error("kernel rejected batch {id}: {reason}")]
    Rejected { id: BatchId, reason: String },
}

/// Result type for gate operations.
pub type Result<T> = std::result::Result<T, GateError>;
