//! Phase/status state machine
//!
//! Owns the session's phase, status, and current round, and the legal
//! transitions between them. Guards are split from commits so the
//! executor can check a transition, perform fallible work (engine
//! initiation), and only then mutate: a rejected or failed start never
//! leaves partial state behind.
//!
//! Policy notes:
//! - Repeated `start_*` calls on an already-running phase are rejected
//!   with an invalid-state error, never treated as idempotent.
//! - Aux-gen may start independently of keygen (before or after it).
//! - `Status::Error` is terminal: no further transitions are legal.

use quorum_core::{Phase, Round, Status};
use tracing::{debug, warn};

use crate::error::{Result, SessionError};

/// Session phase/status/round holder with guarded transitions
#[derive(Debug, Clone)]
pub struct PhaseState {
    phase: Phase,
    status: Status,
    round: Round,
    last_error: Option<String>,
}

impl Default for PhaseState {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseState {
    /// Fresh state: phase INIT, status init, round UNSPECIFIED
    pub fn new() -> Self {
        Self {
            phase: Phase::Init,
            status: Status::Init,
            round: Round::Unspecified,
            last_error: None,
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current status
    pub fn status(&self) -> Status {
        self.status
    }

    /// Current round (always consistent with phase while running)
    pub fn round(&self) -> Round {
        self.round
    }

    /// Last protocol failure reason, if any
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether a phase is actively exchanging rounds
    pub fn is_active(&self) -> bool {
        matches!(self.status, Status::Running | Status::Signing)
    }

    fn ensure_not_terminal(&self) -> Result<()> {
        if self.status.is_terminal() {
            return Err(SessionError::InvalidState(
                "session failed; restart with fresh identifiers".to_string(),
            ));
        }
        Ok(())
    }

    fn ensure_idle(&self) -> Result<()> {
        self.ensure_not_terminal()?;
        if self.is_active() {
            return Err(SessionError::InvalidState(format!(
                "{:?} phase already in progress",
                self.phase
            )));
        }
        Ok(())
    }

    /// Check that key generation may start
    pub fn ensure_can_start_keygen(&self, has_keyshare: bool) -> Result<()> {
        self.ensure_idle()?;
        if has_keyshare {
            return Err(SessionError::InvalidState(
                "keyshare already present; keygen would overwrite it".to_string(),
            ));
        }
        Ok(())
    }

    /// Check that aux-info generation may start
    pub fn ensure_can_start_aux_gen(&self) -> Result<()> {
        self.ensure_idle()
    }

    /// Check that signing may start
    pub fn ensure_can_start_signing(
        &self,
        has_keyshare: bool,
        has_aux: bool,
        signers_set: bool,
    ) -> Result<()> {
        self.ensure_idle()?;
        if !has_keyshare {
            return Err(SessionError::InvalidState(
                "keyshare not ready; complete or import keygen first".to_string(),
            ));
        }
        if !has_aux {
            return Err(SessionError::InvalidState(
                "aux info not ready; complete or import aux-gen first".to_string(),
            ));
        }
        if !signers_set {
            return Err(SessionError::InvalidState(
                "signer set not chosen; call set_signers first".to_string(),
            ));
        }
        Ok(())
    }

    /// Check that an artifact import may install into this state
    pub fn ensure_can_import(&self) -> Result<()> {
        self.ensure_idle()
    }

    /// Commit entry into a phase (guards must have passed)
    pub fn enter(&mut self, phase: Phase) {
        debug!(?phase, "entering phase");
        self.phase = phase;
        self.round = phase.round();
        self.status = match phase {
            Phase::Signing => Status::Signing,
            _ => Status::Running,
        };
    }

    /// Record keygen completion: keyshare is ready, no round in progress
    pub fn complete_keygen(&mut self) {
        debug!("keygen complete");
        self.status = Status::KeyshareReady;
        self.round = Round::Unspecified;
    }

    /// Record aux-gen completion
    pub fn complete_aux_gen(&mut self) {
        debug!("aux-gen complete");
        self.status = Status::AuxReady;
        self.round = Round::Unspecified;
    }

    /// Record signing completion
    pub fn complete_signing(&mut self) {
        debug!("signing complete");
        self.status = Status::Complete;
        self.round = Round::Unspecified;
    }

    /// Record keyshare installation via import
    pub fn mark_keyshare_ready(&mut self) {
        self.status = Status::KeyshareReady;
    }

    /// Record aux info installation via import
    pub fn mark_aux_ready(&mut self) {
        self.status = Status::AuxReady;
    }

    /// Enter the terminal error state
    pub fn fail(&mut self, reason: &str) {
        warn!(reason, "session entering error state");
        self.status = Status::Error;
        self.round = Round::Unspecified;
        self.last_error = Some(reason.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state() {
        let state = PhaseState::new();
        assert_eq!(state.phase(), Phase::Init);
        assert_eq!(state.status(), Status::Init);
        assert_eq!(state.round(), Round::Unspecified);
        assert!(state.last_error().is_none());
    }

    #[test]
    fn test_enter_keygen() {
        let mut state = PhaseState::new();
        state.ensure_can_start_keygen(false).unwrap();
        state.enter(Phase::Keygen);
        assert_eq!(state.phase(), Phase::Keygen);
        assert_eq!(state.status(), Status::Running);
        assert_eq!(state.round(), Round::Keygen);
    }

    #[test]
    fn test_repeated_start_rejected() {
        let mut state = PhaseState::new();
        state.enter(Phase::Keygen);
        assert!(matches!(
            state.ensure_can_start_keygen(false),
            Err(SessionError::InvalidState(_))
        ));
        assert!(matches!(
            state.ensure_can_start_aux_gen(),
            Err(SessionError::InvalidState(_))
        ));
    }

    #[test]
    fn test_keygen_rejected_with_keyshare_present() {
        let state = PhaseState::new();
        assert!(matches!(
            state.ensure_can_start_keygen(true),
            Err(SessionError::InvalidState(_))
        ));
    }

    #[test]
    fn test_aux_gen_independent_of_keygen() {
        let state = PhaseState::new();
        assert!(state.ensure_can_start_aux_gen().is_ok());
    }

    #[test]
    fn test_signing_preconditions() {
        let mut state = PhaseState::new();
        state.enter(Phase::Keygen);
        state.complete_keygen();

        assert!(state.ensure_can_start_signing(true, true, true).is_ok());
        assert!(state.ensure_can_start_signing(false, true, true).is_err());
        assert!(state.ensure_can_start_signing(true, false, true).is_err());
        assert!(state.ensure_can_start_signing(true, true, false).is_err());
    }

    #[test]
    fn test_completion_clears_round() {
        let mut state = PhaseState::new();
        state.enter(Phase::Keygen);
        state.complete_keygen();
        assert_eq!(state.status(), Status::KeyshareReady);
        assert_eq!(state.round(), Round::Unspecified);
        assert_eq!(state.phase(), Phase::Keygen);
    }

    #[test]
    fn test_error_is_terminal() {
        let mut state = PhaseState::new();
        state.enter(Phase::Keygen);
        state.fail("invalid proof from party 2");
        assert_eq!(state.status(), Status::Error);
        assert_eq!(state.last_error(), Some("invalid proof from party 2"));
        assert!(state.ensure_can_start_keygen(false).is_err());
        assert!(state.ensure_can_start_aux_gen().is_err());
        assert!(state.ensure_can_import().is_err());
    }
}
