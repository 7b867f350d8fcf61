//! Round engine capability
//!
//! The engine performs the actual cryptographic round computations
//! (commitments, proofs, curve arithmetic); the session layer only
//! orchestrates it. An engine is supplied explicitly at executor
//! construction by the composition root. The session layer never selects
//! an engine by inspecting the runtime environment.
//!
//! Contract per phase: the executor calls [`RoundEngine::initiate`] once
//! when the phase starts, then feeds every validated batch of peer
//! payloads to [`RoundEngine::advance`] until the engine signals
//! completion or failure. A `Failure` signal is a protocol-level verdict
//! (e.g. an invalid proof from a peer) and poisons the session; an `Err`
//! return is an engine-internal fault and propagates to the caller
//! without being broadcast to peers.

use quorum_core::{AuxInfoArtifact, KeyshareArtifact, PartyIndex, Phase, SessionConfig};

use crate::error::Result;

/// Addressing for an engine-produced payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Deliver to all parties
    Broadcast,
    /// Deliver to one party
    Party(PartyIndex),
}

/// One outgoing round payload produced by the engine
#[derive(Debug, Clone)]
pub struct OutgoingPayload {
    /// Where the payload should be delivered
    pub recipient: Recipient,

    /// Opaque round message bytes
    pub payload: Vec<u8>,
}

impl OutgoingPayload {
    /// Create a broadcast payload
    pub fn broadcast(payload: Vec<u8>) -> Self {
        Self {
            recipient: Recipient::Broadcast,
            payload,
        }
    }

    /// Create a payload addressed to one party
    pub fn to_party(party: PartyIndex, payload: Vec<u8>) -> Self {
        Self {
            recipient: Recipient::Party(party),
            payload,
        }
    }
}

/// One validated inbound round payload handed to the engine
#[derive(Debug, Clone)]
pub struct IncomingPayload {
    /// Sending party's index
    pub from: PartyIndex,

    /// Whether the payload was broadcast (vs addressed to us)
    pub broadcast: bool,

    /// Opaque round message bytes
    pub payload: Vec<u8>,
}

/// Artifact produced when a phase completes
#[derive(Debug, Clone)]
pub enum PhaseArtifact {
    /// Key generation finished
    Keyshare(KeyshareArtifact),

    /// Auxiliary info generation finished
    AuxInfo(AuxInfoArtifact),

    /// Signing finished; the final signature bytes
    Signature(Vec<u8>),
}

/// Engine progress signal returned by [`RoundEngine::advance`]
#[derive(Debug, Clone)]
pub enum EngineSignal {
    /// More rounds remain in this phase
    Continue,

    /// The phase completed and produced an artifact
    PhaseComplete(PhaseArtifact),

    /// A peer contributed invalid cryptography; the session is poisoned
    Failure(String),
}

/// Read-only context the executor hands to the engine on every call
#[derive(Debug, Clone, Copy)]
pub struct EngineContext<'a> {
    /// The session's immutable identity and geometry
    pub config: &'a SessionConfig,

    /// Phase being executed
    pub phase: Phase,

    /// Deterministic per-phase execution seed, identical across parties
    pub execution_seed: [u8; 32],

    /// Chosen signer cohort (signing phase only)
    pub signers: Option<&'a [PartyIndex]>,

    /// Opaque transaction context (signing phase only)
    pub tx_context: Option<&'a [u8]>,
}

/// The cryptographic round computation capability
pub trait RoundEngine {
    /// Produce the first-round outgoing payloads for a freshly started
    /// phase
    fn initiate(&mut self, ctx: &EngineContext<'_>) -> Result<Vec<OutgoingPayload>>;

    /// Consume validated peer payloads for the current round and advance
    ///
    /// Returns the payloads to send out plus a progress signal. Called
    /// with an empty batch when the caller steps without fresh input.
    fn advance(
        &mut self,
        ctx: &EngineContext<'_>,
        incoming: &[IncomingPayload],
    ) -> Result<(Vec<OutgoingPayload>, EngineSignal)>;
}
