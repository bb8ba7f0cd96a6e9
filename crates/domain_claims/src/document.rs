//! The benefit document: one owner's policies and their ledgers

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use core_kernel::Owner;
use crate::error::ClaimError;
use crate::policy::{BenefitSummary, Policy};

/// Opaque concurrency token for optimistic writes
///
/// Every successful save produces a new version; callers only ever compare
/// versions for equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentVersion(u64);

impl DocumentVersion {
    /// Version assigned when a document is first stored
    pub fn initial() -> Self {
        Self(1)
    }

    /// The version that follows this one
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn from_raw(value: u64) -> Self {
        Self(value)
    }

    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocumentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// All policies held by one owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitDocument {
    pub owner: Owner,
    pub policies: Vec<Policy>,
}

/// A benefit document together with the version it was read at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedDocument {
    pub document: BenefitDocument,
    pub version: DocumentVersion,
}

impl BenefitDocument {
    /// Creates a document, rejecting duplicate policy titles and
    /// inconsistent ledgers
    pub fn new(owner: Owner, policies: Vec<Policy>) -> Result<Self, ClaimError> {
        let document = Self { owner, policies };
        document.check_invariants()?;
        Ok(document)
    }

    /// Looks up a policy by its title
    pub fn policy(&self, title: &str) -> Option<&Policy> {
        self.policies.iter().find(|p| p.title == title)
    }

    pub(crate) fn policy_mut(&mut self, title: &str) -> Option<&mut Policy> {
        self.policies.iter_mut().find(|p| p.title == title)
    }

    /// Total number of adjudicated claims across all policies
    pub fn claim_count(&self) -> usize {
        self.policies.iter().map(|p| p.claims().len()).sum()
    }

    pub fn summaries(&self) -> Vec<BenefitSummary> {
        self.policies.iter().map(Policy::summary).collect()
    }

    /// Verifies every policy's ledger and that titles are unique
    pub fn check_invariants(&self) -> Result<(), ClaimError> {
        let mut seen = HashSet::with_capacity(self.policies.len());
        for policy in &self.policies {
            if !seen.insert(policy.title.as_str()) {
                return Err(ClaimError::invariant(format!(
                    "duplicate policy title '{}' for owner {}",
                    policy.title, self.owner
                )));
            }
            policy.check_invariants()?;
        }
        Ok(())
    }
}
