//! One-shot convenience operations
//!
//! Thin single-call wrappers around the executor flow: construct, import
//! any persisted artifacts, choose signers, start the requested phase,
//! run one `step` over the supplied inbound batch, and hand back the
//! outbound envelopes plus the resulting state. No protocol logic lives
//! here. Parameters are explicit structured types; there is no
//! string-encoded parameter parsing at this boundary.

use quorum_core::{PartyIndex, SessionConfig};

use crate::engine::RoundEngine;
use crate::error::Result;
use crate::executor::SessionExecutor;
use crate::snapshot::SessionSnapshot;

/// Operation selector for [`process_session`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOp {
    /// Run a keygen step
    Keygen,
    /// Run an aux-info-gen step
    AuxInfoGen,
    /// Run a signing step
    Signing,
}

/// Parameters for a one-shot session call
#[derive(Debug, Clone)]
pub struct OneShotParams {
    /// Session identity and geometry
    pub config: SessionConfig,

    /// Signer cohort (required for signing)
    pub signers: Option<Vec<PartyIndex>>,

    /// Persisted keyshare to resume from
    pub keyshare: Option<Vec<u8>>,

    /// Persisted aux info to resume from
    pub aux_info: Option<Vec<u8>>,

    /// Transaction context (signing only)
    pub tx_context: Option<Vec<u8>>,

    /// Inbound envelopes for this step
    pub inbound: Vec<Vec<u8>>,
}

/// Result of a one-shot session call
#[derive(Debug, Clone)]
pub struct OneShotOutput {
    /// Envelopes to deliver to peers
    pub outbound: Vec<Vec<u8>>,

    /// Session state after the step
    pub snapshot: SessionSnapshot,

    /// Exported keyshare, when one is held
    pub keyshare: Option<Vec<u8>>,

    /// Exported aux info, when held
    pub aux_info: Option<Vec<u8>>,

    /// Final signature, when signing completed
    pub signature: Option<Vec<u8>>,
}

/// Run one step of the selected operation in a freshly built executor
pub fn process_session<E: RoundEngine>(
    engine: E,
    op: SessionOp,
    params: OneShotParams,
) -> Result<OneShotOutput> {
    let OneShotParams {
        config,
        signers,
        keyshare,
        aux_info,
        tx_context,
        inbound,
    } = params;

    let mut executor = SessionExecutor::new(config, engine)?;
    if let Some(bytes) = &keyshare {
        executor.import_keyshare(bytes)?;
    }
    if let Some(bytes) = &aux_info {
        executor.import_aux_info(bytes)?;
    }
    if let Some(indices) = &signers {
        executor.set_signers(indices)?;
    }

    match op {
        SessionOp::Keygen => executor.start_keygen()?,
        SessionOp::AuxInfoGen => executor.start_aux_gen()?,
        SessionOp::Signing => executor.start_signing(tx_context.unwrap_or_default())?,
    }

    let outbound = executor.step(&inbound)?;

    Ok(OneShotOutput {
        outbound,
        keyshare: executor.export_keyshare().ok(),
        aux_info: executor.export_aux_info().ok(),
        signature: executor.last_signature().map(|s| s.to_vec()),
        snapshot: executor.snapshot(),
    })
}

/// One-shot keygen step
pub fn keygen<E: RoundEngine>(engine: E, params: OneShotParams) -> Result<OneShotOutput> {
    process_session(engine, SessionOp::Keygen, params)
}

/// One-shot aux-info-gen step
pub fn aux_info_gen<E: RoundEngine>(engine: E, params: OneShotParams) -> Result<OneShotOutput> {
    process_session(engine, SessionOp::AuxInfoGen, params)
}

/// One-shot signing step
pub fn signing<E: RoundEngine>(engine: E, params: OneShotParams) -> Result<OneShotOutput> {
    process_session(engine, SessionOp::Signing, params)
}
