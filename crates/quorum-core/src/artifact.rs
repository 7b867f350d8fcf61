//! Durable protocol artifacts (keyshare, auxiliary info)
//!
//! Artifacts are the outputs a party must persist between protocol phases:
//! the keyshare from key generation and the auxiliary info from aux-gen.
//! Both carry a structural header (version, curve, threshold geometry) so
//! an import into a mismatched session is rejected before the opaque
//! engine bytes are ever touched. Imports deliberately do not check
//! session or execution identity; matching artifacts to sessions is the
//! caller's responsibility.

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::envelope::{Curve, PartyIndex};
use crate::error::{CoreError, Result};

/// Current artifact format version
pub const ARTIFACT_VERSION: u16 = 1;

/// A party's durable secret contribution to the distributed key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, Zeroize, ZeroizeOnDrop)]
pub struct KeyshareArtifact {
    /// Artifact format version
    #[zeroize(skip)]
    pub version: u16,

    /// Curve this keyshare was generated for
    #[zeroize(skip)]
    pub curve: Curve,

    /// Threshold the keyshare was generated with
    #[zeroize(skip)]
    pub threshold: u16,

    /// Total parties the keyshare was generated with
    #[zeroize(skip)]
    pub parties_count: u16,

    /// Owning party's index
    #[zeroize(skip)]
    pub party_index: PartyIndex,

    /// Shared (group) public key, compressed encoding
    #[zeroize(skip)]
    pub public_key: Vec<u8>,

    /// Opaque engine-produced secret share material
    pub secret: Vec<u8>,
}

impl KeyshareArtifact {
    /// Serialize to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        bitcode::encode(self)
    }

    /// Deserialize from bytes, rejecting unknown versions
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let artifact: KeyshareArtifact = bitcode::decode(bytes)?;
        if artifact.version != ARTIFACT_VERSION {
            return Err(CoreError::UnsupportedArtifactVersion(artifact.version));
        }
        Ok(artifact)
    }

    /// Check structural compatibility with a session's geometry
    pub fn compatible_with(
        &self,
        curve: Curve,
        threshold: u16,
        parties_count: u16,
        party_index: PartyIndex,
    ) -> std::result::Result<(), String> {
        if self.curve != curve {
            return Err(format!(
                "curve mismatch: artifact {}, session {}",
                self.curve.name(),
                curve.name()
            ));
        }
        if self.threshold != threshold {
            return Err(format!(
                "threshold mismatch: artifact {}, session {}",
                self.threshold, threshold
            ));
        }
        if self.parties_count != parties_count {
            return Err(format!(
                "parties count mismatch: artifact {}, session {}",
                self.parties_count, parties_count
            ));
        }
        if self.party_index != party_index {
            return Err(format!(
                "party index mismatch: artifact {}, session {}",
                self.party_index, party_index
            ));
        }
        Ok(())
    }
}

/// Auxiliary cryptographic material generated once per key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct AuxInfoArtifact {
    /// Artifact format version
    pub version: u16,

    /// Curve this aux info was generated for
    pub curve: Curve,

    /// Total parties the aux info was generated with
    pub parties_count: u16,

    /// Owning party's index
    pub party_index: PartyIndex,

    /// Opaque engine-produced auxiliary material
    pub data: Vec<u8>,
}

impl AuxInfoArtifact {
    /// Serialize to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        bitcode::encode(self)
    }

    /// Deserialize from bytes, rejecting unknown versions
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let artifact: AuxInfoArtifact = bitcode::decode(bytes)?;
        if artifact.version != ARTIFACT_VERSION {
            return Err(CoreError::UnsupportedArtifactVersion(artifact.version));
        }
        Ok(artifact)
    }

    /// Check structural compatibility with a session's geometry
    pub fn compatible_with(
        &self,
        curve: Curve,
        parties_count: u16,
        party_index: PartyIndex,
    ) -> std::result::Result<(), String> {
        if self.curve != curve {
            return Err(format!(
                "curve mismatch: artifact {}, session {}",
                self.curve.name(),
                curve.name()
            ));
        }
        if self.parties_count != parties_count {
            return Err(format!(
                "parties count mismatch: artifact {}, session {}",
                self.parties_count, parties_count
            ));
        }
        if self.party_index != party_index {
            return Err(format!(
                "party index mismatch: artifact {}, session {}",
                self.party_index, party_index
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyshare() -> KeyshareArtifact {
        KeyshareArtifact {
            version: ARTIFACT_VERSION,
            curve: Curve::Secp256k1,
            threshold: 2,
            parties_count: 3,
            party_index: 0,
            public_key: vec![2; 33],
            secret: vec![7; 32],
        }
    }

    #[test]
    fn test_keyshare_roundtrip() {
        let artifact = keyshare();
        let decoded = KeyshareArtifact::from_bytes(&artifact.to_bytes()).unwrap();
        assert_eq!(artifact, decoded);
    }

    #[test]
    fn test_keyshare_version_rejected() {
        let mut artifact = keyshare();
        artifact.version = 9;
        assert!(matches!(
            KeyshareArtifact::from_bytes(&artifact.to_bytes()),
            Err(CoreError::UnsupportedArtifactVersion(9))
        ));
    }

    #[test]
    fn test_keyshare_compat() {
        let artifact = keyshare();
        assert!(artifact
            .compatible_with(Curve::Secp256k1, 2, 3, 0)
            .is_ok());
        assert!(artifact
            .compatible_with(Curve::Secp256k1, 3, 3, 0)
            .is_err());
        assert!(artifact
            .compatible_with(Curve::Secp256r1, 2, 3, 0)
            .is_err());
        assert!(artifact
            .compatible_with(Curve::Secp256k1, 2, 3, 1)
            .is_err());
    }

    #[test]
    fn test_aux_info_roundtrip() {
        let artifact = AuxInfoArtifact {
            version: ARTIFACT_VERSION,
            curve: Curve::Secp256k1,
            parties_count: 3,
            party_index: 1,
            data: vec![9; 64],
        };
        let decoded = AuxInfoArtifact::from_bytes(&artifact.to_bytes()).unwrap();
        assert_eq!(artifact, decoded);
        assert!(decoded.compatible_with(Curve::Secp256k1, 3, 1).is_ok());
        assert!(decoded.compatible_with(Curve::Secp256k1, 4, 1).is_err());
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        assert!(KeyshareArtifact::from_bytes(&[0xff, 0x01, 0x02]).is_err());
        assert!(AuxInfoArtifact::from_bytes(&[]).is_err());
    }
}
