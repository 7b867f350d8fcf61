//! Session-level types shared between the wire model and the orchestrator

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::envelope::{Curve, PartyIndex, Round};

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Freshly constructed, no protocol started
    Init,
    /// Distributed key generation
    Keygen,
    /// Auxiliary information generation
    AuxGen,
    /// Threshold signing
    Signing,
}

impl Phase {
    /// The wire round that corresponds to this phase
    pub fn round(&self) -> Round {
        match self {
            Phase::Init => Round::Unspecified,
            Phase::Keygen => Round::Keygen,
            Phase::AuxGen => Round::AuxInfo,
            Phase::Signing => Round::Signing,
        }
    }

    /// Seed-derivation label for this phase
    pub fn seed_label(&self) -> &'static str {
        match self {
            Phase::Init => "init",
            Phase::Keygen => "keygen",
            Phase::AuxGen => "aux_gen",
            Phase::Signing => "signing",
        }
    }
}

/// Progress status of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Constructed, nothing started
    Init,
    /// A keygen or aux-gen phase is exchanging rounds
    Running,
    /// Keyshare produced or imported
    KeyshareReady,
    /// Auxiliary info produced or imported
    AuxReady,
    /// Signing phase is exchanging rounds
    Signing,
    /// Signature produced
    Complete,
    /// Terminal protocol failure
    Error,
}

impl Status {
    /// Terminal states admit no further phase transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Error)
    }
}

/// Immutable identity and parameters of one party's session
///
/// All fields are fixed at construction; the session layer validates the
/// bounds (`party_index < parties_count`, `1 <= threshold <=
/// parties_count`, non-empty identifiers) before building an executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session identifier
    pub session_id: String,

    /// Execution identifier
    pub execution_id: String,

    /// This party's index (0-indexed)
    pub party_index: PartyIndex,

    /// Minimum signers required (t)
    pub threshold: u16,

    /// Total number of parties (n)
    pub parties_count: u16,

    /// Curve the session operates over
    pub curve: Curve,
}

impl SessionConfig {
    /// Derive the deterministic per-phase execution seed
    ///
    /// All parties derive the same seed for the same session identity and
    /// phase, so engines that bind their transcript to an execution id
    /// agree on it without extra coordination.
    pub fn execution_seed(&self, phase: Phase) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.session_id.as_bytes());
        hasher.update(b":");
        hasher.update(self.execution_id.as_bytes());
        hasher.update(b":");
        hasher.update(phase.seed_label().as_bytes());
        hasher.finalize().into()
    }
}
