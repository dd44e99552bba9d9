//! Extraction failures.

use talaria_core::{KindSlot, ValidationIssue};
use thiserror::Error;

/// Result alias for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// An error raised while pulling raw data out of a request location.
///
/// Extraction errors are reported to clients as a single validation
/// issue located at the failing slot, via [`ExtractError::into_issue`].
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The raw data at this location could not be decoded.
    #[error("failed to extract {slot} data: {detail}")]
    Malformed {
        /// The request location that failed.
        slot: KindSlot,
        /// Human-readable decoding failure.
        detail: String,
    },

    /// The request body exceeds the configured size limit.
    #[error("payload exceeds maximum size of {max} bytes (got {actual})")]
    PayloadTooLarge {
        /// Configured maximum in bytes.
        max: usize,
        /// Actual body size in bytes.
        actual: usize,
    },
}

impl ExtractError {
    /// Returns the request location this error belongs to.
    #[must_use]
    pub fn slot(&self) -> KindSlot {
        match self {
            Self::Malformed { slot, .. } => *slot,
            Self::PayloadTooLarge { .. } => KindSlot::Body,
        }
    }

    /// Converts the error into a client-facing validation issue.
    #[must_use]
    pub fn into_issue(self) -> ValidationIssue {
        let slot = self.slot();
        ValidationIssue::extraction(slot, self.to_string())
    }
}
