//! Error values produced by the alignment core.
//!
//! Only [`AlignError`] ever escapes a request. Tagging and mapping failures are
//! absorbed by the loop that produced them and surface as log entries.

use thiserror::Error;

/// Convenient alias for results returned by the alignment core.
pub type Result<T> = std::result::Result<T, AlignError>;

/// Structural failures that make a request impossible to process.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlignError {
    #[error("timing segment {index} is malformed: {reason}")]
    InvalidSegment { index: usize, reason: String },
    #[error("chunk size must be at least one character")]
    InvalidChunkSize,
}

/// A tagger call failed for a single window.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("tagging failed: {message}")]
pub struct TaggingError {
    message: String,
}

impl TaggingError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A confirmed occurrence could not be mapped back onto the timing map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("character index {index} is outside the timing map (len {len})")]
pub struct MappingError {
    pub index: usize,
    pub len: usize,
}
