//! # Quorum Session
//!
//! Orchestration of one local party's participation in a CGGMP-style
//! threshold-ECDSA protocol: key generation, auxiliary-info generation,
//! signer-subset selection, and threshold signing, exchanged with peers
//! as serialized [`quorum_core::Envelope`] messages.
//!
//! ## Architecture
//!
//! The [`SessionExecutor`] is the composition point. It owns:
//!
//! - a phase/status/round state machine ([`state::PhaseState`]),
//! - inbound envelope validation ([`validator`]),
//! - the signer cohort ([`signers::SignerSet`]),
//! - durable artifacts ([`artifacts::ArtifactStore`]),
//!
//! and dispatches validated round payloads to an injected [`RoundEngine`],
//! the external capability that performs the actual cryptographic round
//! computations. The executor never replaces or selects the engine; the
//! composition root supplies it at construction.
//!
//! ## Usage
//!
//! ```text
//! caller                       executor                    engine
//! ──────                       ────────                    ──────
//! start_keygen()          ───► guard, enter phase     ───► initiate
//! step(inbound)           ───► validate, dispatch     ───► advance
//!   ◄─── outbound envelopes    wrap outgoing payloads
//! ...repeat until the engine completes the phase...
//! export_keyshare()       ───► durable artifact bytes
//! ```
//!
//! Everything is synchronous and single-threaded; callers serialize
//! access to an executor instance and run one instance per local party
//! per session.

pub mod artifacts;
pub mod engine;
pub mod error;
pub mod executor;
pub mod oneshot;
pub mod signers;
pub mod snapshot;
pub mod state;
pub mod testkit;
pub mod validator;

pub use engine::{
    EngineContext, EngineSignal, IncomingPayload, OutgoingPayload, PhaseArtifact, Recipient,
    RoundEngine,
};
pub use error::{Result, SessionError};
pub use executor::SessionExecutor;
pub use oneshot::{
    aux_info_gen, keygen, process_session, signing, OneShotOutput, OneShotParams, SessionOp,
};
pub use snapshot::SessionSnapshot;
pub use validator::{validate_envelope, Verdict};
