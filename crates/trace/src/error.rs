//! Error types for trace projection.

use thiserror::Error;

/// Errors that can occur while projecting a markers log.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The payload or the trace could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for trace operations.
pub type TraceResult<T> = Result<T, TraceError>;
