//! Artifact import/export
//!
//! Holds the durable outputs of completed phases (keyshare, aux info) and
//! implements the import path that resumes a session from previously
//! persisted state without replaying rounds. Imports check structural
//! compatibility with the session geometry only; matching an artifact to
//! the right session/execution identity is the caller's responsibility.

use quorum_core::{AuxInfoArtifact, KeyshareArtifact, SessionConfig};
use tracing::debug;

use crate::error::{Result, SessionError};

/// In-memory store for the session's durable artifacts
#[derive(Debug, Clone, Default)]
pub struct ArtifactStore {
    keyshare: Option<KeyshareArtifact>,
    aux_info: Option<AuxInfoArtifact>,
}

impl ArtifactStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a keyshare is held
    pub fn has_keyshare(&self) -> bool {
        self.keyshare.is_some()
    }

    /// Whether aux info is held
    pub fn has_aux_info(&self) -> bool {
        self.aux_info.is_some()
    }

    /// The held keyshare, if any
    pub fn keyshare(&self) -> Option<&KeyshareArtifact> {
        self.keyshare.as_ref()
    }

    /// The held aux info, if any
    pub fn aux_info(&self) -> Option<&AuxInfoArtifact> {
        self.aux_info.as_ref()
    }

    /// Install a keyshare produced by a completed keygen phase
    pub fn install_keyshare(&mut self, artifact: KeyshareArtifact) {
        self.keyshare = Some(artifact);
    }

    /// Install aux info produced by a completed aux-gen phase
    pub fn install_aux_info(&mut self, artifact: AuxInfoArtifact) {
        self.aux_info = Some(artifact);
    }

    /// Export the keyshare as serialized bytes
    pub fn export_keyshare(&self) -> Result<Vec<u8>> {
        self.keyshare
            .as_ref()
            .map(|ks| ks.to_bytes())
            .ok_or(SessionError::ArtifactNotReady("keyshare"))
    }

    /// Export the aux info as serialized bytes
    pub fn export_aux_info(&self) -> Result<Vec<u8>> {
        self.aux_info
            .as_ref()
            .map(|aux| aux.to_bytes())
            .ok_or(SessionError::ArtifactNotReady("aux info"))
    }

    /// Decode, compatibility-check, and install a persisted keyshare
    pub fn import_keyshare(&mut self, bytes: &[u8], config: &SessionConfig) -> Result<()> {
        let artifact = KeyshareArtifact::from_bytes(bytes)
            .map_err(|e| SessionError::ArtifactDecode(e.to_string()))?;
        artifact
            .compatible_with(
                config.curve,
                config.threshold,
                config.parties_count,
                config.party_index,
            )
            .map_err(SessionError::ArtifactMismatch)?;
        debug!("keyshare imported");
        self.keyshare = Some(artifact);
        Ok(())
    }

    /// Decode, compatibility-check, and install persisted aux info
    pub fn import_aux_info(&mut self, bytes: &[u8], config: &SessionConfig) -> Result<()> {
        let artifact = AuxInfoArtifact::from_bytes(bytes)
            .map_err(|e| SessionError::ArtifactDecode(e.to_string()))?;
        artifact
            .compatible_with(config.curve, config.parties_count, config.party_index)
            .map_err(SessionError::ArtifactMismatch)?;
        debug!("aux info imported");
        self.aux_info = Some(artifact);
        Ok(())
    }
}
