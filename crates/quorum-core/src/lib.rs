//! Quorum Core - Wire envelope model and durable artifacts
//!
//! This crate provides the data model for Quorum, a CGGMP-style
//! threshold-ECDSA session orchestrator:
//!
//! - the versioned wire [`Envelope`] exchanged between parties, with its
//!   round-tagged payload union,
//! - the [`Phase`]/[`Status`] lifecycle enumerations and the immutable
//!   [`SessionConfig`] identity of one party's session,
//! - the durable [`KeyshareArtifact`] and [`AuxInfoArtifact`] formats.
//!
//! No orchestration logic lives here; the session state machine and
//! executor are in `quorum-session`.

pub mod artifact;
pub mod envelope;
pub mod error;
pub mod types;

pub use artifact::{AuxInfoArtifact, KeyshareArtifact, ARTIFACT_VERSION};
pub use envelope::{
    Curve, Envelope, EnvelopeMeta, PartyIndex, Payload, Round, DEFAULT_PAYLOAD_FORMAT,
    ENVELOPE_VERSION,
};
pub use error::{CoreError, Result};
pub use types::{Phase, SessionConfig, Status};
