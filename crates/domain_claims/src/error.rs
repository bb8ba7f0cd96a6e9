//! Claims domain errors

use thiserror::Error;

use core_kernel::{Owner, PortError};
use crate::document::DocumentVersion;

/// Errors surfaced by a [`ClaimStore`](crate::ports::ClaimStore) adapter
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No benefit document for owner {0}")]
    NotFound(Owner),

    #[error("Version conflict for {owner}: expected {expected}, found {actual:?}")]
    VersionConflict {
        owner: Owner,
        expected: DocumentVersion,
        actual: Option<DocumentVersion>,
    },

    #[error("Benefit document already exists for owner {0}")]
    AlreadyExists(Owner),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Stored document is corrupted: {0}")]
    Corrupted(String),
}

impl StoreError {
    /// Returns true if the same call may succeed when repeated
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::VersionConflict { .. } | StoreError::Unavailable(_))
    }
}

/// Broad failure category of a store error, shared with the other ports
impl From<StoreError> for PortError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(owner) => PortError::not_found("BenefitDocument", owner),
            StoreError::VersionConflict { .. } | StoreError::AlreadyExists(_) => {
                PortError::conflict(error.to_string())
            }
            StoreError::Unavailable(message) => PortError::connection(message),
            StoreError::Corrupted(message) => PortError::internal(message),
        }
    }
}

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Invalid claim: {0}")]
    InvalidClaim(String),

    #[error("Invalid claim: no policy titled '{0}'")]
    UnknownPolicy(String),

    #[error("No benefit document for owner {0}")]
    NotFound(Owner),

    #[error("Benefit document for {owner} changed since it was read")]
    VersionConflict { owner: Owner },

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Persistence failure: gave up after {attempts} conflicting commit attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("Ledger invariant violated: {0}")]
    InvariantViolation(String),
}

impl ClaimError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ClaimError::InvalidClaim(message.into())
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        ClaimError::InvariantViolation(message.into())
    }

    /// Malformed requests: non-positive amounts and unknown policy titles
    pub fn is_invalid_claim(&self) -> bool {
        matches!(self, ClaimError::InvalidClaim(_) | ClaimError::UnknownPolicy(_))
    }

    /// Store failures, including an exhausted retry budget
    pub fn is_persistence_failure(&self) -> bool {
        matches!(
            self,
            ClaimError::PersistenceFailure(_) | ClaimError::RetriesExhausted { .. }
        )
    }
}

impl From<StoreError> for ClaimError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(owner) => ClaimError::NotFound(owner),
            StoreError::VersionConflict { owner, .. } => ClaimError::VersionConflict { owner },
            other => ClaimError::PersistenceFailure(PortError::from(other).to_string()),
        }
    }
}
