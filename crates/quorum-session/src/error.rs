//! Error types for session orchestration
//!
//! Variants fall into four groups with distinct recovery semantics:
//! validation failures (identity/round/bounds, constructor arguments),
//! state failures (operation illegal for the current phase/status),
//! artifact failures (malformed or incompatible import bytes), and
//! protocol failures (a peer contributed bad cryptography; terminal).
//! Everything except `Protocol` aborts the triggering call with no state
//! mutation and leaves the executor usable.

use quorum_core::{CoreError, Round};
use thiserror::Error;

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors surfaced by the session executor and its components
#[derive(Debug, Error)]
pub enum SessionError {
    /// Inbound envelope carries a different session id
    #[error("Session id mismatch: expected {expected}, got {got}")]
    SessionIdMismatch { expected: String, got: String },

    /// Inbound envelope carries a different execution id
    #[error("Execution id mismatch: expected {expected}, got {got}")]
    ExecutionIdMismatch { expected: String, got: String },

    /// Inbound envelope belongs to a different round
    #[error("Round mismatch: session at {current:?}, envelope for {envelope:?}")]
    RoundMismatch { current: Round, envelope: Round },

    /// Party index outside `[0, parties_count)`
    #[error("Party index out of range: {index} (parties: {parties})")]
    PartyOutOfRange { index: u16, parties: u16 },

    /// Threshold outside `[1, parties_count]` at construction
    #[error("Invalid threshold: {threshold} must be in [1, {parties}]")]
    InvalidThreshold { threshold: u16, parties: u16 },

    /// Required identifier was empty at construction
    #[error("Missing identifier: {0} must not be empty")]
    EmptyIdentifier(&'static str),

    /// Signer set rejected by validation
    #[error("Invalid signer set: {0}")]
    InvalidSigners(String),

    /// Operation illegal for the current phase/status
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Artifact export requested before the artifact exists
    #[error("Artifact not ready: {0}")]
    ArtifactNotReady(&'static str),

    /// Import bytes could not be decoded
    #[error("Artifact decode failed: {0}")]
    ArtifactDecode(String),

    /// Import bytes decode but do not fit this session's geometry
    #[error("Artifact incompatible with session: {0}")]
    ArtifactMismatch(String),

    /// The round engine reported a cryptographic failure; terminal
    #[error("Protocol failure: {0}")]
    Protocol(String),

    /// Wire-level envelope error
    #[error("Wire error: {0}")]
    Wire(#[from] CoreError),
}
