//! Wire envelope model for threshold-ECDSA session messages
//!
//! Every message exchanged between parties travels as a versioned
//! [`Envelope`] carrying exactly one round payload. The envelope binds the
//! payload to a session identity (session id + execution id), a protocol
//! round, and a sender, so the session layer can reject misdirected or
//! stale traffic before any protocol logic runs.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Party identifier (0-indexed, `0 <= i < parties_count`)
pub type PartyIndex = u16;

/// Current envelope wire version
pub const ENVELOPE_VERSION: u32 = 1;

/// Default encoding used for engine round payloads
pub const DEFAULT_PAYLOAD_FORMAT: &str = "bitcode";

/// Protocol round an envelope belongs to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Round {
    /// No round in progress
    Unspecified = 0,
    /// Distributed key generation
    Keygen = 1,
    /// Auxiliary information generation
    AuxInfo = 2,
    /// Threshold signing
    Signing = 3,
}

impl Round {
    /// Get the round from a u8 value
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Unspecified),
            1 => Some(Self::Keygen),
            2 => Some(Self::AuxInfo),
            3 => Some(Self::Signing),
            _ => None,
        }
    }

    /// Get the human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unspecified => "UNSPECIFIED",
            Self::Keygen => "KEYGEN",
            Self::AuxInfo => "AUX_INFO",
            Self::Signing => "SIGNING",
        }
    }
}

/// Elliptic curve the session operates over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
#[repr(u8)]
pub enum Curve {
    /// secp256k1 (Bitcoin, Ethereum)
    Secp256k1 = 0,
    /// secp256r1 / NIST P-256
    Secp256r1 = 1,
}

impl Curve {
    /// Get the curve from a u8 value
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Secp256k1),
            1 => Some(Self::Secp256r1),
            _ => None,
        }
    }

    /// Get the human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Secp256k1 => "secp256k1",
            Self::Secp256r1 => "secp256r1",
        }
    }
}

/// Sender-reported session context carried on every envelope
///
/// These fields describe the sender's view of the session. The receiving
/// side checks `party_index` bounds but treats `threshold` as
/// informational only; `retry` is transport bookkeeping and is never
/// interpreted by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct EnvelopeMeta {
    /// Curve the sender is operating over
    pub curve: Curve,

    /// Sender's view of the signing threshold (informational)
    pub threshold: u16,

    /// Sender's view of the total party count
    pub parties_count: u16,

    /// Sender's claimed party index
    pub party_index: PartyIndex,

    /// Opaque transaction context (signing phase only)
    pub tx_context: Vec<u8>,

    /// Transport retry counter (informational)
    pub retry: u32,

    /// Encoding of the engine payload bytes
    pub payload_format: String,

    /// Identifier of the key this session operates on
    pub key_id: String,
}

/// Round payload carried by an envelope
///
/// Exactly one variant is present per envelope, selected by the round. An
/// `Error` payload may accompany any round; it announces a terminal
/// protocol failure to peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum Payload {
    /// Key generation round message
    Keygen { payload: Vec<u8> },

    /// Auxiliary info round message
    AuxInfo { payload: Vec<u8> },

    /// Presignature round message
    Presignature { payload: Vec<u8> },

    /// Signing round message, bound to the transaction context
    Signing {
        payload: Vec<u8>,
        tx_context: Vec<u8>,
    },

    /// Terminal protocol failure announcement
    Error { code: u32, message: String },
}

impl Payload {
    /// Check that this payload variant is legal for the given round
    ///
    /// `Error` payloads are legal in any round; every other variant must
    /// agree with the envelope's round field.
    pub fn matches_round(&self, round: Round) -> bool {
        match self {
            Payload::Keygen { .. } => round == Round::Keygen,
            Payload::AuxInfo { .. } => round == Round::AuxInfo,
            Payload::Presignature { .. } | Payload::Signing { .. } => round == Round::Signing,
            Payload::Error { .. } => true,
        }
    }

    /// Get the raw engine payload bytes, if this variant carries any
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Payload::Keygen { payload }
            | Payload::AuxInfo { payload }
            | Payload::Presignature { payload }
            | Payload::Signing { payload, .. } => Some(payload),
            Payload::Error { .. } => None,
        }
    }
}

/// Wire message exchanged between parties
///
/// An empty `to_parties` list means broadcast to all parties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Envelope {
    /// Wire version
    pub version: u32,

    /// Session identifier (immutable for a session)
    pub session_id: String,

    /// Execution identifier (immutable for a session)
    pub execution_id: String,

    /// Round this envelope belongs to
    pub round: Round,

    /// Sender's party index
    pub from_party: PartyIndex,

    /// Recipients; empty means broadcast
    pub to_parties: Vec<PartyIndex>,

    /// Sender-reported session context
    pub meta: EnvelopeMeta,

    /// The round payload
    pub payload: Payload,
}

impl Envelope {
    /// Whether this envelope is addressed to all parties
    pub fn is_broadcast(&self) -> bool {
        self.to_parties.is_empty()
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        bitcode::encode(self)
    }

    /// Deserialize from bytes, rejecting unknown versions and payloads
    /// inconsistent with the round field
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let env: Envelope = bitcode::decode(bytes)?;
        if env.version != ENVELOPE_VERSION {
            return Err(CoreError::UnsupportedVersion(env.version));
        }
        if !env.payload.matches_round(env.round) {
            return Err(CoreError::PayloadRoundMismatch(env.round));
        }
        Ok(env)
    }
}
