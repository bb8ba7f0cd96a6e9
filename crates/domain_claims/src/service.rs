//! Claims application service
//!
//! Orchestrates the read-adjudicate-commit cycle against a [`ClaimStore`].
//! The service holds no mutable state of its own; every submission reads the
//! owner's document fresh, so a lost optimistic race is resolved by simply
//! running the cycle again.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use core_kernel::{Amount, ClaimId, Owner};
use crate::adjudication::{adjudicate_in, commit};
use crate::claim::{ClaimOutcome, ClaimRequest};
use crate::config::ClaimsConfig;
use crate::document::VersionedDocument;
use crate::error::ClaimError;
use crate::history::ClaimHistory;
use crate::policy::BenefitSummary;
use crate::ports::ClaimStore;

/// What the caller learns about a submitted claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimReceipt {
    pub claim_id: ClaimId,
    pub policy_title: String,
    pub outcome: ClaimOutcome,
    pub payment: Amount,
    /// Coverage left on the policy after this claim
    pub remaining: Amount,
    /// Commit attempts used, 1 when there was no contention
    pub attempts: u32,
}

/// Service for submitting claims and reading claim history
///
/// # Example
///
/// ```rust,ignore
/// let service = ClaimsService::new(store, ClaimsConfig::from_env()?);
/// let receipt = service.submit_claim(&owner, request).await?;
/// match receipt.outcome {
///     ClaimOutcome::Denied => println!("limit reached"),
///     _ => println!("paid {}", receipt.payment),
/// }
/// ```
#[derive(Clone)]
pub struct ClaimsService {
    store: Arc<dyn ClaimStore>,
    config: ClaimsConfig,
}

impl ClaimsService {
    pub fn new(store: Arc<dyn ClaimStore>, config: ClaimsConfig) -> Self {
        Self { store, config }
    }

    pub fn with_defaults(store: Arc<dyn ClaimStore>) -> Self {
        Self::new(store, ClaimsConfig::default())
    }

    pub fn config(&self) -> &ClaimsConfig {
        &self.config
    }

    /// Adjudicates a claim and records it in the owner's ledger
    ///
    /// Version conflicts are retried with a fresh read up to
    /// `max_commit_attempts` times in total.
    ///
    /// # Errors
    ///
    /// - `InvalidClaim` / `UnknownPolicy` for malformed requests (never retried)
    /// - `NotFound` if the owner has no benefit document
    /// - `PersistenceFailure` if the store fails, `RetriesExhausted` if every
    ///   attempt lost a race
    #[instrument(
        skip(self, request),
        fields(owner = %owner, policy = %request.policy_title, amount = %request.amount)
    )]
    pub async fn submit_claim(
        &self,
        owner: &Owner,
        request: ClaimRequest,
    ) -> Result<ClaimReceipt, ClaimError> {
        request.validate()?;

        let max_attempts = self.config.max_commit_attempts.max(1);
        for attempt in 1..=max_attempts {
            let snapshot = self.load_validated(owner).await?;
            let decision = adjudicate_in(&snapshot.document, &request)?;
            debug!(
                attempt,
                version = %snapshot.version,
                outcome = %decision.outcome,
                payment = %decision.payment,
                "committing adjudicated claim"
            );

            match commit(self.store.as_ref(), snapshot, &request, &decision).await {
                Ok(committed) => {
                    info!(
                        claim_id = %committed.claim.id,
                        outcome = %committed.claim.outcome,
                        payment = %committed.claim.payment,
                        remaining = %committed.remaining,
                        attempt,
                        "claim committed"
                    );
                    return Ok(ClaimReceipt {
                        claim_id: committed.claim.id,
                        policy_title: request.policy_title,
                        outcome: committed.claim.outcome,
                        payment: committed.claim.payment,
                        remaining: committed.remaining,
                        attempts: attempt,
                    });
                }
                Err(ClaimError::VersionConflict { .. }) => {
                    warn!(attempt, max_attempts, "benefit document changed during commit, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        error!(max_attempts, "claim commit retries exhausted");
        Err(ClaimError::RetriesExhausted {
            attempts: max_attempts,
        })
    }

    /// Returns every claim the owner has made, oldest service date first
    #[instrument(skip(self), fields(owner = %owner))]
    pub async fn get_history(&self, owner: &Owner) -> Result<ClaimHistory, ClaimError> {
        let snapshot = self.load_validated(owner).await?;
        let history = ClaimHistory::from_document(&snapshot.document);
        debug!(claims = history.len(), "claim history projected");
        Ok(history)
    }

    /// Returns the owner's policies with their ledger position
    #[instrument(skip(self), fields(owner = %owner))]
    pub async fn get_benefits(&self, owner: &Owner) -> Result<Vec<BenefitSummary>, ClaimError> {
        let snapshot = self.load_validated(owner).await?;
        Ok(snapshot.document.summaries())
    }

    async fn load_validated(&self, owner: &Owner) -> Result<VersionedDocument, ClaimError> {
        let snapshot = self.store.load(owner).await?;

        if snapshot.document.owner != *owner {
            error!(stored_owner = %snapshot.document.owner, "store returned another owner's document");
            return Err(ClaimError::PersistenceFailure(format!(
                "store returned the document of {} for {}",
                snapshot.document.owner, owner
            )));
        }
        if let Err(e) = snapshot.document.check_invariants() {
            error!(error = %e, "stored benefit document is inconsistent");
            return Err(ClaimError::PersistenceFailure(format!(
                "stored benefit document for {owner} is inconsistent: {e}"
            )));
        }
        Ok(snapshot)
    }
}
