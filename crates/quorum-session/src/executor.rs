//! Session executor
//!
//! Composes the phase state machine, envelope validator, signer set, and
//! artifact store around an injected [`RoundEngine`], and drives one
//! party's participation in a threshold-ECDSA session: start a phase,
//! feed inbound envelopes through `step`, deliver the returned envelopes
//! to peers, repeat until the engine completes the phase.
//!
//! `step` is synchronous and processes exactly one batch per invocation.
//! The executor holds no background resources; callers serialize access
//! externally and simply stop stepping to cancel.
//!
//! First-round behavior: `start_*` asks the engine for the phase's
//! first-round payloads and parks them; the next `step` call emits them.
//! `step(&[])` on a freshly started phase therefore deterministically
//! returns the first-round broadcast.

use quorum_core::{
    Envelope, EnvelopeMeta, PartyIndex, Payload, Phase, Round, SessionConfig,
    DEFAULT_PAYLOAD_FORMAT, ENVELOPE_VERSION,
};
use tracing::{debug, info, warn};

use crate::artifacts::ArtifactStore;
use crate::engine::{
    EngineContext, EngineSignal, IncomingPayload, OutgoingPayload, PhaseArtifact, Recipient,
    RoundEngine,
};
use crate::error::{Result, SessionError};
use crate::signers::SignerSet;
use crate::snapshot::SessionSnapshot;
use crate::state::PhaseState;
use crate::validator::{validate_envelope, Verdict};

/// Error code carried on synthesized error envelopes
const ERROR_CODE_PROTOCOL: u32 = 1;

/// One party's session executor
pub struct SessionExecutor<E> {
    config: SessionConfig,
    state: PhaseState,
    signers: SignerSet,
    artifacts: ArtifactStore,
    engine: E,
    pending_outgoing: Vec<OutgoingPayload>,
    tx_context: Vec<u8>,
    last_signature: Option<Vec<u8>>,
}

impl<E: RoundEngine> SessionExecutor<E> {
    /// Construct an executor bound to one party's identity
    ///
    /// The engine is supplied here by the composition root; the executor
    /// never selects one itself.
    pub fn new(config: SessionConfig, engine: E) -> Result<Self> {
        if config.session_id.is_empty() {
            return Err(SessionError::EmptyIdentifier("session_id"));
        }
        if config.execution_id.is_empty() {
            return Err(SessionError::EmptyIdentifier("execution_id"));
        }
        if config.party_index >= config.parties_count {
            return Err(SessionError::PartyOutOfRange {
                index: config.party_index,
                parties: config.parties_count,
            });
        }
        if config.threshold == 0 || config.threshold > config.parties_count {
            return Err(SessionError::InvalidThreshold {
                threshold: config.threshold,
                parties: config.parties_count,
            });
        }

        info!(
            session = %config.session_id,
            party = config.party_index,
            threshold = config.threshold,
            parties = config.parties_count,
            "session executor created"
        );

        Ok(Self {
            config,
            state: PhaseState::new(),
            signers: SignerSet::new(),
            artifacts: ArtifactStore::new(),
            engine,
            pending_outgoing: Vec::new(),
            tx_context: Vec::new(),
            last_signature: None,
        })
    }

    /// The session's immutable identity and geometry
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Start distributed key generation
    pub fn start_keygen(&mut self) -> Result<()> {
        self.state
            .ensure_can_start_keygen(self.artifacts.has_keyshare())?;

        let ctx = Self::engine_context(&self.config, Phase::Keygen, None, None);
        let first = self.engine.initiate(&ctx)?;

        self.state.enter(Phase::Keygen);
        self.tx_context.clear();
        self.pending_outgoing = first;
        info!(session = %self.config.session_id, "keygen started");
        Ok(())
    }

    /// Start auxiliary info generation
    pub fn start_aux_gen(&mut self) -> Result<()> {
        self.state.ensure_can_start_aux_gen()?;

        let ctx = Self::engine_context(&self.config, Phase::AuxGen, None, None);
        let first = self.engine.initiate(&ctx)?;

        self.state.enter(Phase::AuxGen);
        self.tx_context.clear();
        self.pending_outgoing = first;
        info!(session = %self.config.session_id, "aux-gen started");
        Ok(())
    }

    /// Start threshold signing over the given transaction context
    pub fn start_signing(&mut self, tx_context: Vec<u8>) -> Result<()> {
        self.state.ensure_can_start_signing(
            self.artifacts.has_keyshare(),
            self.artifacts.has_aux_info(),
            self.signers.is_set(),
        )?;
        if !self.signers.contains(self.config.party_index) {
            return Err(SessionError::InvalidState(
                "local party is not in the signer set".to_string(),
            ));
        }

        let ctx = Self::engine_context(
            &self.config,
            Phase::Signing,
            self.signers.get(),
            Some(&tx_context),
        );
        let first = self.engine.initiate(&ctx)?;

        self.state.enter(Phase::Signing);
        self.tx_context = tx_context;
        self.last_signature = None;
        self.pending_outgoing = first;
        info!(session = %self.config.session_id, "signing started");
        Ok(())
    }

    /// Choose the signing cohort (last write wins)
    pub fn set_signers(&mut self, indices: &[PartyIndex]) -> Result<()> {
        self.signers
            .set(indices, self.config.threshold, self.config.parties_count)
    }

    /// Export the keyshare artifact
    pub fn export_keyshare(&self) -> Result<Vec<u8>> {
        self.artifacts.export_keyshare()
    }

    /// Export the aux info artifact
    pub fn export_aux_info(&self) -> Result<Vec<u8>> {
        self.artifacts.export_aux_info()
    }

    /// Install a persisted keyshare, bypassing the keygen rounds
    pub fn import_keyshare(&mut self, bytes: &[u8]) -> Result<()> {
        self.state.ensure_can_import()?;
        self.artifacts.import_keyshare(bytes, &self.config)?;
        self.state.mark_keyshare_ready();
        Ok(())
    }

    /// Install persisted aux info, bypassing the aux-gen rounds
    pub fn import_aux_info(&mut self, bytes: &[u8]) -> Result<()> {
        self.state.ensure_can_import()?;
        self.artifacts.import_aux_info(bytes, &self.config)?;
        self.state.mark_aux_ready();
        Ok(())
    }

    /// The final signature, once signing completed
    pub fn last_signature(&self) -> Option<&[u8]> {
        self.last_signature.as_deref()
    }

    /// Process one batch of inbound envelopes, returning envelopes to send
    ///
    /// Validation is all-or-nothing: the first violating envelope aborts
    /// the whole call before any state mutation or engine dispatch, so a
    /// failed call is observably a no-op.
    pub fn step(&mut self, inbound: &[Vec<u8>]) -> Result<Vec<Vec<u8>>> {
        let mut envelopes = Vec::with_capacity(inbound.len());
        for bytes in inbound {
            envelopes.push(Envelope::from_bytes(bytes)?);
        }

        let current_round = self.state.round();
        let mut accepted: Vec<&Envelope> = Vec::new();
        for env in &envelopes {
            match validate_envelope(env, &self.config, current_round)? {
                Verdict::Accept => accepted.push(env),
                Verdict::DropSelfOriginated => {}
            }
        }

        // A peer announcing failure poisons the session; the whole cohort
        // converges on the same terminal state.
        if let Some(env) = accepted
            .iter()
            .find(|e| matches!(e.payload, Payload::Error { .. }))
        {
            if let Payload::Error { code, message } = &env.payload {
                let reason = format!(
                    "party {} reported failure (code {}): {}",
                    env.from_party, code, message
                );
                self.state.fail(&reason);
                return Err(SessionError::Protocol(reason));
            }
        }

        if !self.state.is_active() {
            if !accepted.is_empty() {
                return Err(SessionError::InvalidState(
                    "no phase in progress".to_string(),
                ));
            }
            return Ok(Vec::new());
        }

        let phase = self.state.phase();
        let incoming: Vec<IncomingPayload> = accepted
            .iter()
            .filter_map(|env| {
                env.payload.bytes().map(|b| IncomingPayload {
                    from: env.from_party,
                    broadcast: env.is_broadcast(),
                    payload: b.to_vec(),
                })
            })
            .collect();
        debug!(
            ?phase,
            inbound = incoming.len(),
            "dispatching to round engine"
        );

        let (more_out, signal) = {
            let tx = (phase == Phase::Signing).then_some(self.tx_context.as_slice());
            let ctx = Self::engine_context(&self.config, phase, self.signers.get(), tx);
            self.engine.advance(&ctx, &incoming)?
        };

        let mut outgoing = std::mem::take(&mut self.pending_outgoing);
        outgoing.extend(more_out);

        match signal {
            EngineSignal::Continue => {}
            EngineSignal::PhaseComplete(artifact) => match (phase, artifact) {
                (Phase::Keygen, PhaseArtifact::Keyshare(ks)) => {
                    info!(session = %self.config.session_id, "keyshare ready");
                    self.artifacts.install_keyshare(ks);
                    self.state.complete_keygen();
                }
                (Phase::AuxGen, PhaseArtifact::AuxInfo(aux)) => {
                    info!(session = %self.config.session_id, "aux info ready");
                    self.artifacts.install_aux_info(aux);
                    self.state.complete_aux_gen();
                }
                (Phase::Signing, PhaseArtifact::Signature(sig)) => {
                    info!(session = %self.config.session_id, "signature produced");
                    // Final broadcast so every peer observes the result.
                    outgoing.push(OutgoingPayload::broadcast(sig.clone()));
                    self.last_signature = Some(sig);
                    self.state.complete_signing();
                }
                (phase, artifact) => {
                    let reason = format!(
                        "engine returned {} artifact during {:?} phase",
                        artifact_kind(&artifact),
                        phase
                    );
                    self.state.fail(&reason);
                    return Err(SessionError::Protocol(reason));
                }
            },
            EngineSignal::Failure(reason) => {
                warn!(session = %self.config.session_id, reason, "protocol failure");
                self.state.fail(&reason);
                let error_env = self.error_envelope(phase.round(), &reason);
                return Ok(vec![error_env.to_bytes()]);
            }
        }

        Ok(outgoing
            .iter()
            .map(|out| self.wrap(phase, out).to_bytes())
            .collect())
    }

    /// Read-only view of the session state; never mutates
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.config.session_id.clone(),
            execution_id: self.config.execution_id.clone(),
            party_index: self.config.party_index,
            threshold: self.config.threshold,
            parties_count: self.config.parties_count,
            curve: self.config.curve.name().to_string(),
            phase: self.state.phase(),
            status: self.state.status(),
            round: self.state.round(),
            signers: self.signers.get().map(|s| s.to_vec()),
            has_keyshare: self.artifacts.has_keyshare(),
            has_aux: self.artifacts.has_aux_info(),
            public_key: self
                .artifacts
                .keyshare()
                .map(|ks| hex::encode(&ks.public_key)),
            key_share_threshold: self.artifacts.keyshare().map(|ks| ks.threshold),
            signature: self.last_signature.as_ref().map(hex::encode),
            last_error: self.state.last_error().map(str::to_string),
        }
    }

    fn engine_context<'a>(
        config: &'a SessionConfig,
        phase: Phase,
        signers: Option<&'a [PartyIndex]>,
        tx_context: Option<&'a [u8]>,
    ) -> EngineContext<'a> {
        EngineContext {
            config,
            phase,
            execution_seed: config.execution_seed(phase),
            signers,
            tx_context,
        }
    }

    fn meta(&self) -> EnvelopeMeta {
        EnvelopeMeta {
            curve: self.config.curve,
            threshold: self.config.threshold,
            parties_count: self.config.parties_count,
            party_index: self.config.party_index,
            tx_context: self.tx_context.clone(),
            retry: 0,
            payload_format: DEFAULT_PAYLOAD_FORMAT.to_string(),
            key_id: String::new(),
        }
    }

    fn wrap(&self, phase: Phase, out: &OutgoingPayload) -> Envelope {
        let to_parties = match out.recipient {
            Recipient::Broadcast => Vec::new(),
            Recipient::Party(i) => vec![i],
        };
        let payload = match phase {
            Phase::Keygen => Payload::Keygen {
                payload: out.payload.clone(),
            },
            Phase::AuxGen => Payload::AuxInfo {
                payload: out.payload.clone(),
            },
            Phase::Signing => Payload::Signing {
                payload: out.payload.clone(),
                tx_context: self.tx_context.clone(),
            },
            // Not reachable while a phase is active; kept total for safety.
            Phase::Init => Payload::Error {
                code: ERROR_CODE_PROTOCOL,
                message: "no phase in progress".to_string(),
            },
        };
        Envelope {
            version: ENVELOPE_VERSION,
            session_id: self.config.session_id.clone(),
            execution_id: self.config.execution_id.clone(),
            round: phase.round(),
            from_party: self.config.party_index,
            to_parties,
            meta: self.meta(),
            payload,
        }
    }

    fn error_envelope(&self, round: Round, reason: &str) -> Envelope {
        Envelope {
            version: ENVELOPE_VERSION,
            session_id: self.config.session_id.clone(),
            execution_id: self.config.execution_id.clone(),
            round,
            from_party: self.config.party_index,
            to_parties: Vec::new(),
            meta: self.meta(),
            payload: Payload::Error {
                code: ERROR_CODE_PROTOCOL,
                message: reason.to_string(),
            },
        }
    }
}

fn artifact_kind(artifact: &PhaseArtifact) -> &'static str {
    match artifact {
        PhaseArtifact::Keyshare(_) => "keyshare",
        PhaseArtifact::AuxInfo(_) => "aux info",
        PhaseArtifact::Signature(_) => "signature",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_core::Curve;

    /// Engine that emits one broadcast on initiate and continues forever.
    struct InertEngine;

    impl RoundEngine for InertEngine {
        fn initiate(&mut self, _ctx: &EngineContext<'_>) -> Result<Vec<OutgoingPayload>> {
            Ok(vec![OutgoingPayload::broadcast(vec![0xAA])])
        }

        fn advance(
            &mut self,
            _ctx: &EngineContext<'_>,
            _incoming: &[IncomingPayload],
        ) -> Result<(Vec<OutgoingPayload>, EngineSignal)> {
            Ok((Vec::new(), EngineSignal::Continue))
        }
    }

    fn config() -> SessionConfig {
        SessionConfig {
            session_id: "session-1".to_string(),
            execution_id: "exec-1".to_string(),
            party_index: 0,
            threshold: 2,
            parties_count: 3,
            curve: Curve::Secp256k1,
        }
    }

    #[test]
    fn test_constructor_validation() {
        let mut bad = config();
        bad.session_id = String::new();
        assert!(matches!(
            SessionExecutor::new(bad, InertEngine),
            Err(SessionError::EmptyIdentifier("session_id"))
        ));

        let mut bad = config();
        bad.party_index = 3;
        assert!(matches!(
            SessionExecutor::new(bad, InertEngine),
            Err(SessionError::PartyOutOfRange { index: 3, parties: 3 })
        ));

        let mut bad = config();
        bad.threshold = 4;
        assert!(matches!(
            SessionExecutor::new(bad, InertEngine),
            Err(SessionError::InvalidThreshold { threshold: 4, parties: 3 })
        ));

        let mut bad = config();
        bad.threshold = 0;
        assert!(SessionExecutor::new(bad, InertEngine).is_err());
    }

    #[test]
    fn test_first_step_emits_pending_broadcast() {
        let mut exec = SessionExecutor::new(config(), InertEngine).unwrap();
        exec.start_keygen().unwrap();

        let out = exec.step(&[]).unwrap();
        assert_eq!(out.len(), 1);

        let env = Envelope::from_bytes(&out[0]).unwrap();
        assert_eq!(env.session_id, "session-1");
        assert_eq!(env.round, Round::Keygen);
        assert!(env.is_broadcast());
        assert!(matches!(env.payload, Payload::Keygen { .. }));

        // Pending payloads are emitted exactly once.
        assert!(exec.step(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_step_idle_with_no_input_is_noop() {
        let mut exec = SessionExecutor::new(config(), InertEngine).unwrap();
        assert!(exec.step(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_garbage_inbound_rejected() {
        let mut exec = SessionExecutor::new(config(), InertEngine).unwrap();
        exec.start_keygen().unwrap();
        assert!(matches!(
            exec.step(&[vec![0xFF, 0x00]]),
            Err(SessionError::Wire(_))
        ));
    }
}
