//! Error types for the markers log.

use thiserror::Error;

/// Errors that can occur while recording or delivering the markers log.
#[derive(Debug, Error)]
pub enum MarkersError {
    /// Failed to serialize the log
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A record was appended without a name
    #[error("Event name must not be empty")]
    EmptyName,

    /// The scripting runtime handle was requested before the host created it
    #[error("Script runtime is not available")]
    RuntimeUnavailable,

    /// A sink rejected the payload
    #[error("Delivery error: {0}")]
    Delivery(String),

    /// Configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MarkersError {
    /// Create a delivery error from any displayable reason.
    pub fn delivery(reason: impl std::fmt::Display) -> Self {
        Self::Delivery(reason.to_string())
    }
}

/// Result type for markers operations.
pub type MarkersResult<T> = Result<T, MarkersError>;
