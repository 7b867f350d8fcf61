//! Error types for the Quorum core library

use thiserror::Error;

/// Result type for core wire/artifact operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur while encoding or decoding wire data
#[derive(Debug, Error)]
pub enum CoreError {
    /// Serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization failed
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Envelope version is not supported
    #[error("Unsupported envelope version: {0}")]
    UnsupportedVersion(u32),

    /// Envelope payload variant does not match its round field
    #[error("Payload variant does not match round {0:?}")]
    PayloadRoundMismatch(crate::envelope::Round),

    /// Artifact version is not supported
    #[error("Unsupported artifact version: {0}")]
    UnsupportedArtifactVersion(u16),
}

impl From<bitcode::Error> for CoreError {
    fn from(e: bitcode::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
