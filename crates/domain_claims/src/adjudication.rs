//! Claim adjudication logic
//!
//! Adjudication is split in two. [`adjudicate`] is a pure function of the
//! policy's coverage terms and the request, so repeating it against the same
//! ledger state always gives the same decision. [`commit`] applies a decision
//! to the document it was computed from and persists it with an optimistic
//! version check; a lost race is reported as `VersionConflict` and nothing is
//! written.
//!
//! # Payout rule
//!
//! ```text
//! remaining = claim_limit - amount_claimed
//! eligible  = amount * percent_covered / 100
//!
//! remaining <= 0        -> DENIED   payment 0          total unchanged
//! eligible <= remaining -> FULL     payment eligible   total + eligible
//! otherwise             -> PARTIAL  payment remaining  total = claim_limit
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{Amount, MoneyError};
use crate::claim::{Claim, ClaimOutcome, ClaimRequest};
use crate::document::{BenefitDocument, DocumentVersion, VersionedDocument};
use crate::error::ClaimError;
use crate::policy::{CoverageTerms, Policy};
use crate::ports::ClaimStore;

/// Result of adjudicating a claim against a ledger snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjudicationDecision {
    pub outcome: ClaimOutcome,
    pub payment: Amount,
    /// Ledger total once this claim is committed
    pub new_amount_claimed: Amount,
    /// Ledger total the decision was computed from
    pub based_on_amount_claimed: Amount,
}

impl AdjudicationDecision {
    /// Turns the decision into the adjudicated claim record
    pub fn into_claim(self, request: &ClaimRequest) -> Claim {
        Claim::adjudicated(request, self.outcome, self.payment)
    }
}

/// Applies the payout rule to a coverage snapshot
///
/// # Errors
///
/// `InvalidClaim` if the arithmetic overflows, which only happens for
/// amounts far beyond what [`ClaimRequest::validate`] accepts.
pub fn decide(terms: CoverageTerms, amount: Amount) -> Result<AdjudicationDecision, ClaimError> {
    let overflow = |e: MoneyError| ClaimError::invalid(format!("claim amount {amount} cannot be adjudicated: {e}"));

    let remaining = terms.claim_limit.checked_sub(terms.amount_claimed).map_err(overflow)?;
    let eligible = terms.percent_covered.apply(amount).map_err(overflow)?;

    let (outcome, payment, new_amount_claimed) = if !remaining.is_positive() {
        (ClaimOutcome::Denied, Amount::zero(), terms.amount_claimed)
    } else if eligible <= remaining {
        let total = terms.amount_claimed.checked_add(eligible).map_err(overflow)?;
        (ClaimOutcome::Full, eligible, total)
    } else {
        (ClaimOutcome::Partial, remaining, terms.claim_limit)
    };

    Ok(AdjudicationDecision {
        outcome,
        payment,
        new_amount_claimed,
        based_on_amount_claimed: terms.amount_claimed,
    })
}

/// Adjudicates a request against a single policy
///
/// # Errors
///
/// `InvalidClaim` if the requested amount is not positive.
pub fn adjudicate(policy: &Policy, request: &ClaimRequest) -> Result<AdjudicationDecision, ClaimError> {
    request.validate()?;
    let decision = decide(policy.coverage_terms(), request.amount)?;
    debug!(
        policy = %policy.title,
        amount = %request.amount,
        outcome = %decision.outcome,
        payment = %decision.payment,
        "claim adjudicated"
    );
    Ok(decision)
}

/// Adjudicates a request against the policy it names in the document
///
/// # Errors
///
/// `InvalidClaim` for a non-positive amount, `UnknownPolicy` if the document
/// has no policy with the requested title.
pub fn adjudicate_in(
    document: &BenefitDocument,
    request: &ClaimRequest,
) -> Result<AdjudicationDecision, ClaimError> {
    request.validate()?;
    let policy = document
        .policy(&request.policy_title)
        .ok_or_else(|| ClaimError::UnknownPolicy(request.policy_title.clone()))?;
    adjudicate(policy, request)
}

/// A claim that has been durably recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedClaim {
    pub claim: Claim,
    pub version: DocumentVersion,
    /// Coverage left on the policy after this claim
    pub remaining: Amount,
}

/// Records a decision in the snapshot it was computed from and saves it
///
/// The policy's current total must still be the one the decision was based
/// on; otherwise the decision is stale and `VersionConflict` is returned
/// before anything is written. The save itself is conditional on
/// `snapshot.version`, so a concurrent commit also surfaces as
/// `VersionConflict`.
pub async fn commit(
    store: &dyn ClaimStore,
    snapshot: VersionedDocument,
    request: &ClaimRequest,
    decision: &AdjudicationDecision,
) -> Result<CommittedClaim, ClaimError> {
    let VersionedDocument { mut document, version } = snapshot;
    let owner = document.owner.clone();

    let policy = document
        .policy_mut(&request.policy_title)
        .ok_or_else(|| ClaimError::UnknownPolicy(request.policy_title.clone()))?;

    if policy.amount_claimed() != decision.based_on_amount_claimed {
        return Err(ClaimError::VersionConflict { owner });
    }

    let claim = decision.into_claim(request);
    policy.record(claim.clone(), decision.new_amount_claimed)?;
    let remaining = policy.remaining();

    let version = store.save(&document, version).await?;

    Ok(CommittedClaim {
        claim,
        version,
        remaining,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_kernel::{Owner, Percentage};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::ports::mock::InMemoryClaimStore;

    fn terms(percent: Decimal, limit: Decimal, claimed: Decimal) -> CoverageTerms {
        CoverageTerms {
            percent_covered: Percentage::new(percent).unwrap(),
            claim_limit: Amount::new(limit),
            amount_claimed: Amount::new(claimed),
        }
    }

    fn request(title: &str, amount: Decimal) -> ClaimRequest {
        ClaimRequest::new(
            title,
            Amount::new(amount),
            "City Clinic",
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
        )
    }

    #[test]
    fn test_full_payment_within_remaining() {
        let decision = decide(terms(dec!(50), dec!(1000), dec!(0)), Amount::new(dec!(100))).unwrap();

        assert_eq!(decision.outcome, ClaimOutcome::Full);
        assert_eq!(decision.payment.value(), dec!(50));
        assert_eq!(decision.new_amount_claimed.value(), dec!(50));
    }

    #[test]
    fn test_partial_payment_caps_at_limit() {
        let decision = decide(terms(dec!(100), dec!(500), dec!(400)), Amount::new(dec!(1000))).unwrap();

        assert_eq!(decision.outcome, ClaimOutcome::Partial);
        assert_eq!(decision.payment.value(), dec!(100));
        assert_eq!(decision.new_amount_claimed.value(), dec!(500));
    }

    #[test]
    fn test_denied_when_limit_reached() {
        let decision = decide(terms(dec!(80), dec!(500), dec!(500)), Amount::new(dec!(20))).unwrap();

        assert_eq!(decision.outcome, ClaimOutcome::Denied);
        assert!(decision.payment.is_zero());
        assert_eq!(decision.new_amount_claimed.value(), dec!(500));
    }

    #[test]
    fn test_eligible_exactly_remaining_is_full() {
        let decision = decide(terms(dec!(100), dec!(500), dec!(400)), Amount::new(dec!(100))).unwrap();

        assert_eq!(decision.outcome, ClaimOutcome::Full);
        assert_eq!(decision.new_amount_claimed.value(), dec!(500));
    }

    #[test]
    fn test_zero_limit_always_denied() {
        let decision = decide(terms(dec!(100), dec!(0), dec!(0)), Amount::new(dec!(10))).unwrap();
        assert_eq!(decision.outcome, ClaimOutcome::Denied);
    }

    #[test]
    fn test_zero_percent_pays_nothing_in_full() {
        let decision = decide(terms(dec!(0), dec!(100), dec!(0)), Amount::new(dec!(10))).unwrap();

        assert_eq!(decision.outcome, ClaimOutcome::Full);
        assert!(decision.payment.is_zero());
    }

    #[test]
    fn test_overflowing_amount_is_invalid_not_a_panic() {
        let result = decide(terms(dec!(50), dec!(1000), dec!(0)), Amount::new(Decimal::MAX));
        assert!(matches!(result, Err(ClaimError::InvalidClaim(_))));

        let policy = Policy::new("Dental", "", Percentage::new(dec!(50)).unwrap(), Amount::new(dec!(1000))).unwrap();
        let err = adjudicate(&policy, &request("Dental", Decimal::MAX)).unwrap_err();
        assert!(err.is_invalid_claim());
    }

    #[test]
    fn test_adjudicate_in_unknown_policy() {
        let owner = Owner::new("ana@example.com").unwrap();
        let document = BenefitDocument::new(owner, vec![]).unwrap();

        let err = adjudicate_in(&document, &request("Dental", dec!(10))).unwrap_err();
        assert!(matches!(err, ClaimError::UnknownPolicy(ref t) if t == "Dental"));
    }

    #[test]
    fn test_adjudicate_rejects_non_positive_amount() {
        let policy = Policy::new("Dental", "", Percentage::FULL, Amount::new(dec!(10))).unwrap();
        let err = adjudicate(&policy, &request("Dental", dec!(0))).unwrap_err();
        assert!(err.is_invalid_claim());
    }

    fn dental_document() -> BenefitDocument {
        let owner = Owner::new("ana@example.com").unwrap();
        let policy = Policy::new(
            "Dental",
            "tooth",
            Percentage::new(dec!(50)).unwrap(),
            Amount::new(dec!(1000)),
        )
        .unwrap();
        BenefitDocument::new(owner, vec![policy]).unwrap()
    }

    #[tokio::test]
    async fn test_commit_appends_claim_and_saves() {
        let store = InMemoryClaimStore::with_documents(vec![dental_document()]).await;
        let snapshot = store.load(&dental_document().owner).await.unwrap();
        let req = request("Dental", dec!(100));
        let decision = adjudicate_in(&snapshot.document, &req).unwrap();

        let committed = commit(&store, snapshot.clone(), &req, &decision).await.unwrap();

        assert_ne!(committed.version, snapshot.version);
        assert_eq!(committed.remaining.value(), dec!(950));
        let stored = store.snapshot(&dental_document().owner).await.unwrap();
        let policy = stored.policy("Dental").unwrap();
        assert_eq!(policy.amount_claimed().value(), dec!(50));
        assert_eq!(policy.claims(), &[committed.claim]);
    }

    #[tokio::test]
    async fn test_commit_stale_decision_writes_nothing() {
        let store = InMemoryClaimStore::with_documents(vec![dental_document()]).await;
        let snapshot = store.load(&dental_document().owner).await.unwrap();
        let req = request("Dental", dec!(100));
        let mut decision = adjudicate_in(&snapshot.document, &req).unwrap();
        decision.based_on_amount_claimed = Amount::new(dec!(25));

        let err = commit(&store, snapshot, &req, &decision).await.unwrap_err();

        assert!(matches!(err, ClaimError::VersionConflict { .. }));
        assert_eq!(store.successful_saves(), 0);
    }

    #[tokio::test]
    async fn test_commit_lost_race_is_conflict() {
        let store = InMemoryClaimStore::with_documents(vec![dental_document()]).await;
        let first = store.load(&dental_document().owner).await.unwrap();
        let second = first.clone();
        let req = request("Dental", dec!(100));
        let decision = adjudicate_in(&first.document, &req).unwrap();

        commit(&store, first, &req, &decision).await.unwrap();
        let err = commit(&store, second, &req, &decision).await.unwrap_err();

        assert!(matches!(err, ClaimError::VersionConflict { .. }));
        let stored = store.snapshot(&dental_document().owner).await.unwrap();
        assert_eq!(stored.claim_count(), 1);
    }
}
