//! Read-only session snapshots
//!
//! A snapshot is a pure serialization of the session's observable state
//! for external observers and checkpointing. Taking one never mutates the
//! session and is safe at any time, including after a protocol failure.

use quorum_core::{PartyIndex, Phase, Round, Status};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::error::SessionError;

/// Observable state of one party's session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Session identifier
    pub session_id: String,

    /// Execution identifier
    pub execution_id: String,

    /// This party's index
    pub party_index: PartyIndex,

    /// Signing threshold (t)
    pub threshold: u16,

    /// Total parties (n)
    pub parties_count: u16,

    /// Curve name
    pub curve: String,

    /// Current phase
    pub phase: Phase,

    /// Current status
    pub status: Status,

    /// Current round
    pub round: Round,

    /// Chosen signer cohort, if set
    pub signers: Option<Vec<PartyIndex>>,

    /// Whether a keyshare is held
    pub has_keyshare: bool,

    /// Whether aux info is held
    pub has_aux: bool,

    /// Shared public key (hex), when a keyshare is held
    pub public_key: Option<String>,

    /// Threshold recorded in the held keyshare, when present
    pub key_share_threshold: Option<u16>,

    /// Final signature (hex), once signing completed
    pub signature: Option<String>,

    /// Last protocol failure reason, if any
    pub last_error: Option<String>,
}

impl SessionSnapshot {
    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| SessionError::Wire(quorum_core::CoreError::Serialization(e.to_string())))
    }
}
