//! Signer cohort selection
//!
//! Stores the declared t-of-n subset of parties that will perform
//! signing. Validation is purely structural: cardinality must equal the
//! threshold and every index must be in range. Reachability or honesty of
//! the listed parties is out of scope.

use std::collections::BTreeSet;

use quorum_core::PartyIndex;
use tracing::debug;

use crate::error::{Result, SessionError};

/// The chosen signing cohort, unset until validated
#[derive(Debug, Clone, Default)]
pub struct SignerSet {
    indices: Option<Vec<PartyIndex>>,
}

impl SignerSet {
    /// Create an empty (unset) signer set
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a cohort has been chosen
    pub fn is_set(&self) -> bool {
        self.indices.is_some()
    }

    /// The chosen cohort, sorted ascending
    pub fn get(&self) -> Option<&[PartyIndex]> {
        self.indices.as_deref()
    }

    /// Whether the given party is in the cohort
    pub fn contains(&self, party: PartyIndex) -> bool {
        self.indices
            .as_ref()
            .map(|s| s.binary_search(&party).is_ok())
            .unwrap_or(false)
    }

    /// Validate and store a cohort, replacing any previous one
    ///
    /// Last write wins; phase, status, and round are never touched here.
    pub fn set(
        &mut self,
        indices: &[PartyIndex],
        threshold: u16,
        parties_count: u16,
    ) -> Result<()> {
        let distinct: BTreeSet<PartyIndex> = indices.iter().copied().collect();
        if distinct.len() != indices.len() {
            return Err(SessionError::InvalidSigners(format!(
                "duplicate indices in {:?}",
                indices
            )));
        }
        if distinct.len() != threshold as usize {
            return Err(SessionError::InvalidSigners(format!(
                "expected exactly {} signers, got {}",
                threshold,
                distinct.len()
            )));
        }
        if let Some(&out_of_range) = distinct.iter().find(|&&i| i >= parties_count) {
            return Err(SessionError::PartyOutOfRange {
                index: out_of_range,
                parties: parties_count,
            });
        }

        let sorted: Vec<PartyIndex> = distinct.into_iter().collect();
        debug!(signers = ?sorted, "signer set chosen");
        self.indices = Some(sorted);
        Ok(())
    }
}
