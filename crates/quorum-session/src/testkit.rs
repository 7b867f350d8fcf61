//! Deterministic engines for tests and simulation
//!
//! [`MockEngine`] runs a single-round commit/collect flow per phase with
//! sha2-derived payloads and artifacts, so multi-party wiring can be
//! exercised end to end without any real cryptography. It is injected
//! through the same [`RoundEngine`] seam as a production engine; nothing
//! here is selected implicitly.

use std::collections::BTreeSet;

use quorum_core::{AuxInfoArtifact, KeyshareArtifact, PartyIndex, Phase, ARTIFACT_VERSION};
use sha2::{Digest, Sha256};

use crate::engine::{
    EngineContext, EngineSignal, IncomingPayload, OutgoingPayload, PhaseArtifact, RoundEngine,
};
use crate::error::Result;

fn digest(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Deterministic single-round engine
///
/// `initiate` broadcasts a commitment bound to the execution seed and the
/// local party index. `advance` collects peer payloads and completes the
/// phase once every expected peer has contributed, producing artifacts
/// derived from the shared execution seed (so all parties agree on the
/// public key and signature).
#[derive(Debug, Default)]
pub struct MockEngine {
    phase: Option<Phase>,
    seen: BTreeSet<PartyIndex>,
}

impl MockEngine {
    /// Create a fresh mock engine
    pub fn new() -> Self {
        Self::default()
    }

    fn expected_peers(ctx: &EngineContext<'_>) -> usize {
        match ctx.phase {
            Phase::Signing => ctx
                .signers
                .map(|s| s.len().saturating_sub(1))
                .unwrap_or(0),
            _ => ctx.config.parties_count as usize - 1,
        }
    }

    fn artifact(ctx: &EngineContext<'_>) -> PhaseArtifact {
        let seed = &ctx.execution_seed;
        let party = ctx.config.party_index.to_le_bytes();
        match ctx.phase {
            Phase::Signing => {
                let tx = ctx.tx_context.unwrap_or_default();
                let sig = digest(&[b"sig", seed, tx]);
                PhaseArtifact::Signature(sig.to_vec())
            }
            Phase::AuxGen => PhaseArtifact::AuxInfo(AuxInfoArtifact {
                version: ARTIFACT_VERSION,
                curve: ctx.config.curve,
                parties_count: ctx.config.parties_count,
                party_index: ctx.config.party_index,
                data: digest(&[b"aux", seed, &party]).to_vec(),
            }),
            _ => {
                let mut public_key = vec![0x02];
                public_key.extend_from_slice(&digest(&[b"pk", seed]));
                PhaseArtifact::Keyshare(KeyshareArtifact {
                    version: ARTIFACT_VERSION,
                    curve: ctx.config.curve,
                    threshold: ctx.config.threshold,
                    parties_count: ctx.config.parties_count,
                    party_index: ctx.config.party_index,
                    public_key,
                    secret: digest(&[b"sk", seed, &party]).to_vec(),
                })
            }
        }
    }
}

impl RoundEngine for MockEngine {
    fn initiate(&mut self, ctx: &EngineContext<'_>) -> Result<Vec<OutgoingPayload>> {
        self.phase = Some(ctx.phase);
        self.seen.clear();
        let commit = digest(&[
            b"commit",
            &ctx.execution_seed,
            &ctx.config.party_index.to_le_bytes(),
        ]);
        Ok(vec![OutgoingPayload::broadcast(commit.to_vec())])
    }

    fn advance(
        &mut self,
        ctx: &EngineContext<'_>,
        incoming: &[IncomingPayload],
    ) -> Result<(Vec<OutgoingPayload>, EngineSignal)> {
        if self.phase != Some(ctx.phase) {
            self.phase = Some(ctx.phase);
            self.seen.clear();
        }
        for payload in incoming {
            self.seen.insert(payload.from);
        }

        if self.seen.len() >= Self::expected_peers(ctx) {
            Ok((Vec::new(), EngineSignal::PhaseComplete(Self::artifact(ctx))))
        } else {
            Ok((Vec::new(), EngineSignal::Continue))
        }
    }
}

/// Engine whose first advance reports a protocol failure
///
/// Used to exercise the terminal error path (status transition plus the
/// synthesized error envelope).
#[derive(Debug)]
pub struct FailingEngine {
    reason: String,
}

impl FailingEngine {
    /// Create an engine that fails with the given reason
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl RoundEngine for FailingEngine {
    fn initiate(&mut self, ctx: &EngineContext<'_>) -> Result<Vec<OutgoingPayload>> {
        let commit = digest(&[b"commit", &ctx.execution_seed]);
        Ok(vec![OutgoingPayload::broadcast(commit.to_vec())])
    }

    fn advance(
        &mut self,
        _ctx: &EngineContext<'_>,
        _incoming: &[IncomingPayload],
    ) -> Result<(Vec<OutgoingPayload>, EngineSignal)> {
        Ok((Vec::new(), EngineSignal::Failure(self.reason.clone())))
    }
}
