//! Property-based tests for quorum-core using proptest
//!
//! These tests verify invariants that should hold for all valid inputs.

use proptest::prelude::*;
use quorum_core::{
    AuxInfoArtifact, Curve, Envelope, EnvelopeMeta, KeyshareArtifact, Payload, Round,
    ARTIFACT_VERSION, DEFAULT_PAYLOAD_FORMAT, ENVELOPE_VERSION,
};

// ============================================
// Arbitrary Implementations
// ============================================

fn arb_curve() -> impl Strategy<Value = Curve> {
    prop_oneof![Just(Curve::Secp256k1), Just(Curve::Secp256r1)]
}

fn arb_round_payload() -> impl Strategy<Value = (Round, Payload)> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 0..256)
            .prop_map(|payload| (Round::Keygen, Payload::Keygen { payload })),
        prop::collection::vec(any::<u8>(), 0..256)
            .prop_map(|payload| (Round::AuxInfo, Payload::AuxInfo { payload })),
        (
            prop::collection::vec(any::<u8>(), 0..256),
            prop::collection::vec(any::<u8>(), 0..64),
        )
            .prop_map(|(payload, tx_context)| {
                (
                    Round::Signing,
                    Payload::Signing {
                        payload,
                        tx_context,
                    },
                )
            }),
        (any::<u32>(), "[a-z ]{0,40}").prop_map(|(code, message)| {
            (Round::Unspecified, Payload::Error { code, message })
        }),
    ]
}

fn arb_meta() -> impl Strategy<Value = EnvelopeMeta> {
    (
        arb_curve(),
        1u16..16,
        1u16..16,
        0u16..16,
        prop::collection::vec(any::<u8>(), 0..32),
        any::<u32>(),
    )
        .prop_map(
            |(curve, threshold, parties_count, party_index, tx_context, retry)| EnvelopeMeta {
                curve,
                threshold,
                parties_count,
                party_index,
                tx_context,
                retry,
                payload_format: DEFAULT_PAYLOAD_FORMAT.to_string(),
                key_id: String::new(),
            },
        )
}

fn arb_envelope() -> impl Strategy<Value = Envelope> {
    (
        "[a-z0-9-]{1,32}",
        "[a-z0-9-]{1,32}",
        arb_round_payload(),
        0u16..16,
        prop::collection::vec(0u16..16, 0..4),
        arb_meta(),
    )
        .prop_map(
            |(session_id, execution_id, (round, payload), from_party, to_parties, meta)| {
                Envelope {
                    version: ENVELOPE_VERSION,
                    session_id,
                    execution_id,
                    round,
                    from_party,
                    to_parties,
                    meta,
                    payload,
                }
            },
        )
}

// ============================================
// Properties
// ============================================

proptest! {
    #[test]
    fn envelope_roundtrip(env in arb_envelope()) {
        let bytes = env.to_bytes();
        let decoded = Envelope::from_bytes(&bytes).unwrap();
        prop_assert_eq!(env, decoded);
    }

    #[test]
    fn envelope_payload_always_matches_round(env in arb_envelope()) {
        prop_assert!(env.payload.matches_round(env.round));
    }

    #[test]
    fn broadcast_iff_no_recipients(env in arb_envelope()) {
        prop_assert_eq!(env.is_broadcast(), env.to_parties.is_empty());
    }

    #[test]
    fn keyshare_roundtrip(
        curve in arb_curve(),
        threshold in 1u16..16,
        parties_count in 1u16..16,
        party_index in 0u16..16,
        public_key in prop::collection::vec(any::<u8>(), 33..=33),
        secret in prop::collection::vec(any::<u8>(), 0..128),
    ) {
        let artifact = KeyshareArtifact {
            version: ARTIFACT_VERSION,
            curve,
            threshold,
            parties_count,
            party_index,
            public_key,
            secret,
        };
        let decoded = KeyshareArtifact::from_bytes(&artifact.to_bytes()).unwrap();
        prop_assert_eq!(artifact, decoded);
    }

    #[test]
    fn keyshare_compat_is_exact(
        curve in arb_curve(),
        threshold in 1u16..16,
        parties_count in 1u16..16,
        party_index in 0u16..16,
    ) {
        let artifact = KeyshareArtifact {
            version: ARTIFACT_VERSION,
            curve,
            threshold,
            parties_count,
            party_index,
            public_key: vec![2; 33],
            secret: vec![1; 32],
        };
        prop_assert!(artifact
            .compatible_with(curve, threshold, parties_count, party_index)
            .is_ok());
        prop_assert!(artifact
            .compatible_with(curve, threshold + 1, parties_count, party_index)
            .is_err());
        prop_assert!(artifact
            .compatible_with(curve, threshold, parties_count + 1, party_index)
            .is_err());
    }

    #[test]
    fn aux_info_roundtrip(
        curve in arb_curve(),
        parties_count in 1u16..16,
        party_index in 0u16..16,
        data in prop::collection::vec(any::<u8>(), 0..128),
    ) {
        let artifact = AuxInfoArtifact {
            version: ARTIFACT_VERSION,
            curve,
            parties_count,
            party_index,
            data,
        };
        let decoded = AuxInfoArtifact::from_bytes(&artifact.to_bytes()).unwrap();
        prop_assert_eq!(artifact, decoded);
    }
}
