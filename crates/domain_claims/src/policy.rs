//! Policy coverage terms and the per-policy claims ledger

use serde::{Deserialize, Serialize};

use core_kernel::{Amount, Percentage};
use crate::claim::Claim;
use crate::error::ClaimError;

/// A benefit policy and its ledger
///
/// Coverage terms (percentage covered, lifetime claim limit) are fixed at
/// enrollment. The ledger half of the policy, `amount_claimed` and the claim
/// log, is only mutated by committing an adjudicated claim, so both fields
/// are private and exposed read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Policy title, unique within a benefit document
    pub title: String,
    /// Display icon for the policy
    #[serde(default)]
    pub icon: String,
    /// Percentage of each claim the policy reimburses
    pub percent_covered: Percentage,
    /// Lifetime payout cap
    pub claim_limit: Amount,
    #[serde(default)]
    amount_claimed: Amount,
    #[serde(default)]
    claims: Vec<Claim>,
}

/// Snapshot of the values adjudication depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageTerms {
    pub percent_covered: Percentage,
    pub claim_limit: Amount,
    pub amount_claimed: Amount,
}

impl CoverageTerms {
    /// Coverage left before the lifetime limit is reached; may be negative
    /// only if the ledger was already inconsistent
    pub fn remaining(&self) -> Amount {
        self.claim_limit - self.amount_claimed
    }
}

/// Read-only summary of a policy for benefit overviews
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitSummary {
    pub title: String,
    pub icon: String,
    pub percent_covered: Percentage,
    pub claim_limit: Amount,
    pub amount_claimed: Amount,
    pub remaining: Amount,
    pub claim_count: usize,
}

impl Policy {
    /// Creates a freshly enrolled policy with nothing claimed
    pub fn new(
        title: impl Into<String>,
        icon: impl Into<String>,
        percent_covered: Percentage,
        claim_limit: Amount,
    ) -> Result<Self, ClaimError> {
        Self::restore(title, icon, percent_covered, claim_limit, Amount::zero(), Vec::new())
    }

    /// Rebuilds a policy with existing ledger state, checking invariants
    pub fn restore(
        title: impl Into<String>,
        icon: impl Into<String>,
        percent_covered: Percentage,
        claim_limit: Amount,
        amount_claimed: Amount,
        claims: Vec<Claim>,
    ) -> Result<Self, ClaimError> {
        let policy = Self {
            title: title.into(),
            icon: icon.into(),
            percent_covered,
            claim_limit,
            amount_claimed,
            claims,
        };
        policy.check_invariants()?;
        Ok(policy)
    }

    /// Running total paid out against the limit
    pub fn amount_claimed(&self) -> Amount {
        self.amount_claimed
    }

    /// Claims in the order they were adjudicated
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Coverage left before the lifetime limit is reached
    pub fn remaining(&self) -> Amount {
        self.coverage_terms().remaining()
    }

    pub fn coverage_terms(&self) -> CoverageTerms {
        CoverageTerms {
            percent_covered: self.percent_covered,
            claim_limit: self.claim_limit,
            amount_claimed: self.amount_claimed,
        }
    }

    pub fn summary(&self) -> BenefitSummary {
        BenefitSummary {
            title: self.title.clone(),
            icon: self.icon.clone(),
            percent_covered: self.percent_covered,
            claim_limit: self.claim_limit,
            amount_claimed: self.amount_claimed,
            remaining: self.remaining(),
            claim_count: self.claims.len(),
        }
    }

    /// Verifies `0 <= amount_claimed <= claim_limit` and a non-negative limit
    pub fn check_invariants(&self) -> Result<(), ClaimError> {
        if self.title.trim().is_empty() {
            return Err(ClaimError::invariant("policy title must not be blank"));
        }
        if self.claim_limit.is_negative() {
            return Err(ClaimError::invariant(format!(
                "policy '{}' has negative claim limit {}",
                self.title, self.claim_limit
            )));
        }
        if self.amount_claimed.is_negative() || self.amount_claimed > self.claim_limit {
            return Err(ClaimError::invariant(format!(
                "policy '{}' has claimed {} outside 0..={}",
                self.title, self.amount_claimed, self.claim_limit
            )));
        }
        Ok(())
    }

    /// Appends an adjudicated claim and moves the ledger total
    ///
    /// The ledger is left untouched if the new total would break the
    /// invariants or would move the total backwards.
    pub(crate) fn record(&mut self, claim: Claim, new_amount_claimed: Amount) -> Result<(), ClaimError> {
        if new_amount_claimed < self.amount_claimed || new_amount_claimed > self.claim_limit {
            return Err(ClaimError::invariant(format!(
                "policy '{}' cannot move claimed total from {} to {} (limit {})",
                self.title, self.amount_claimed, new_amount_claimed, self.claim_limit
            )));
        }
        if self.amount_claimed + claim.payment != new_amount_claimed {
            return Err(ClaimError::invariant(format!(
                "payment {} does not account for claimed total {} -> {}",
                claim.payment, self.amount_claimed, new_amount_claimed
            )));
        }
        self.amount_claimed = new_amount_claimed;
        self.claims.push(claim);
        Ok(())
    }
}
