//! Inbound envelope validation
//!
//! Every inbound envelope passes through [`validate_envelope`] before any
//! payload reaches the round engine. Checks run in a fixed order and the
//! first violation wins: session id, execution id, round, party-index
//! bounds. Envelopes the local party sent itself are echoes, not peer
//! input; they yield a drop verdict rather than an error.
//!
//! `meta.threshold` is sender-reported context and is deliberately not
//! cross-checked against the local session threshold; a mismatch there
//! does not reject the envelope.

use quorum_core::{Envelope, Round, SessionConfig};
use tracing::trace;

use crate::error::{Result, SessionError};

/// Outcome of validating one inbound envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Envelope is peer input for the current round
    Accept,
    /// Envelope originated from the local party; drop silently
    DropSelfOriginated,
}

/// Validate one inbound envelope against the session identity and round
pub fn validate_envelope(
    env: &Envelope,
    config: &SessionConfig,
    current_round: Round,
) -> Result<Verdict> {
    if env.session_id != config.session_id {
        return Err(SessionError::SessionIdMismatch {
            expected: config.session_id.clone(),
            got: env.session_id.clone(),
        });
    }

    if env.execution_id != config.execution_id {
        return Err(SessionError::ExecutionIdMismatch {
            expected: config.execution_id.clone(),
            got: env.execution_id.clone(),
        });
    }

    // Strictly single-round: no queuing of future-round envelopes.
    if env.round != current_round {
        return Err(SessionError::RoundMismatch {
            current: current_round,
            envelope: env.round,
        });
    }

    if env.from_party >= config.parties_count {
        return Err(SessionError::PartyOutOfRange {
            index: env.from_party,
            parties: config.parties_count,
        });
    }

    if env.meta.party_index >= config.parties_count {
        return Err(SessionError::PartyOutOfRange {
            index: env.meta.party_index,
            parties: config.parties_count,
        });
    }

    if env.from_party == config.party_index {
        trace!(from = env.from_party, "dropping self-originated envelope");
        return Ok(Verdict::DropSelfOriginated);
    }

    Ok(Verdict::Accept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_core::{Curve, EnvelopeMeta, Payload, DEFAULT_PAYLOAD_FORMAT, ENVELOPE_VERSION};

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

    fn envelope(from: u16) -> Envelope {
        Envelope {
            version: ENVELOPE_VERSION,
            session_id: "session-1".to_string(),
            execution_id: "exec-1".to_string(),
            round: Round::Keygen,
            from_party: from,
            to_parties: Vec::new(),
            meta: EnvelopeMeta {
                curve: Curve::Secp256k1,
                threshold: 2,
                parties_count: 3,
                party_index: from,
                tx_context: Vec::new(),
                retry: 0,
                payload_format: DEFAULT_PAYLOAD_FORMAT.to_string(),
                key_id: String::new(),
            },
            payload: Payload::Keygen {
                payload: vec![1, 2, 3],
            },
        }
    }

    #[test]
    fn test_accepts_peer_envelope() {
        let verdict = validate_envelope(&envelope(1), &config(), Round::Keygen).unwrap();
        assert_eq!(verdict, Verdict::Accept);
    }

    #[test]
    fn test_session_id_mismatch() {
        let mut env = envelope(1);
        env.session_id = "other".to_string();
        assert!(matches!(
            validate_envelope(&env, &config(), Round::Keygen),
            Err(SessionError::SessionIdMismatch { .. })
        ));
    }

    #[test]
    fn test_execution_id_mismatch() {
        let mut env = envelope(1);
        env.execution_id = "other".to_string();
        assert!(matches!(
            validate_envelope(&env, &config(), Round::Keygen),
            Err(SessionError::ExecutionIdMismatch { .. })
        ));
    }

    #[test]
    fn test_round_mismatch() {
        assert!(matches!(
            validate_envelope(&envelope(1), &config(), Round::AuxInfo),
            Err(SessionError::RoundMismatch {
                current: Round::AuxInfo,
                envelope: Round::Keygen,
            })
        ));
    }

    #[test]
    fn test_identity_checked_before_round() {
        // A wrong session id on a wrong-round envelope reports the id
        // mismatch, not the round mismatch.
        let mut env = envelope(1);
        env.session_id = "other".to_string();
        env.round = Round::Signing;
        assert!(matches!(
            validate_envelope(&env, &config(), Round::Keygen),
            Err(SessionError::SessionIdMismatch { .. })
        ));
    }

    #[test]
    fn test_from_party_out_of_range() {
        let env = envelope(3);
        assert!(matches!(
            validate_envelope(&env, &config(), Round::Keygen),
            Err(SessionError::PartyOutOfRange { index: 3, parties: 3 })
        ));
    }

    #[test]
    fn test_meta_party_index_out_of_range() {
        let mut env = envelope(1);
        env.meta.party_index = 9;
        assert!(matches!(
            validate_envelope(&env, &config(), Round::Keygen),
            Err(SessionError::PartyOutOfRange { index: 9, parties: 3 })
        ));
    }

    #[test]
    fn test_self_originated_dropped() {
        let verdict = validate_envelope(&envelope(0), &config(), Round::Keygen).unwrap();
        assert_eq!(verdict, Verdict::DropSelfOriginated);
    }

    #[test]
    fn test_threshold_mismatch_is_lenient() {
        let mut env = envelope(1);
        env.meta.threshold = 1;
        let verdict = validate_envelope(&env, &config(), Round::Keygen).unwrap();
        assert_eq!(verdict, Verdict::Accept);
    }
}
