//! Claim requests and adjudicated claims
//!
//! A claim exists in two forms. [`ClaimRequest`] is the proposed claim as
//! submitted by the policy holder; [`Claim`] is the adjudicated, terminal
//! record appended to a policy's log. The only way to obtain a `Claim` is
//! from an [`AdjudicationDecision`](crate::adjudication::AdjudicationDecision),
//! so a claim cannot skip adjudication or be adjudicated twice.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{Amount, ClaimId};
use crate::error::ClaimError;

/// Largest amount a single claim may request
pub const MAX_CLAIM_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0); // 1_000_000_000_000

/// Outcome of adjudicating a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimOutcome {
    /// Nothing paid; the policy limit was already reached
    Denied,
    /// Paid up to the remaining limit, less than the eligible amount
    Partial,
    /// The eligible amount was paid in full
    Full,
}

impl fmt::Display for ClaimOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ClaimOutcome::Denied => "DENIED",
            ClaimOutcome::Partial => "PARTIAL",
            ClaimOutcome::Full => "FULL",
        };
        f.write_str(label)
    }
}

/// A proposed claim against one of the owner's policies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRequest {
    /// Title of the policy the claim is made against
    pub policy_title: String,
    /// Amount requested for reimbursement
    pub amount: Amount,
    /// Service provider
    pub provider: String,
    /// Date of service
    pub date: NaiveDate,
}

impl ClaimRequest {
    pub fn new(
        policy_title: impl Into<String>,
        amount: Amount,
        provider: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            policy_title: policy_title.into(),
            amount,
            provider: provider.into(),
            date,
        }
    }

    /// Checks the request is well formed
    ///
    /// The requested amount must be strictly positive and a policy title must
    /// be given. Whether the title names an existing policy is checked
    /// against the document during adjudication.
    pub fn validate(&self) -> Result<(), ClaimError> {
        if !self.amount.is_positive() {
            return Err(ClaimError::invalid(format!(
                "claim amount must be positive, got {}",
                self.amount
            )));
        }
        if self.amount.value() > MAX_CLAIM_AMOUNT {
            return Err(ClaimError::invalid(format!(
                "claim amount {} exceeds the maximum of {}",
                self.amount, MAX_CLAIM_AMOUNT
            )));
        }
        if self.policy_title.trim().is_empty() {
            return Err(ClaimError::invalid("policy title is required"));
        }
        Ok(())
    }
}

/// An adjudicated claim in a policy's claim log
///
/// Claims are append-only: once recorded, the outcome and payment never
/// change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,
    /// Date of service
    pub date: NaiveDate,
    /// Amount requested
    pub amount: Amount,
    /// Service provider
    pub provider: String,
    /// Amount paid out
    pub payment: Amount,
    /// Adjudication outcome
    pub outcome: ClaimOutcome,
    /// When the claim was adjudicated
    pub adjudicated_at: DateTime<Utc>,
}

impl Claim {
    pub(crate) fn adjudicated(
        request: &ClaimRequest,
        outcome: ClaimOutcome,
        payment: Amount,
    ) -> Self {
        Self {
            id: ClaimId::new_v7(),
            date: request.date,
            amount: request.amount,
            provider: request.provider.clone(),
            payment,
            outcome,
            adjudicated_at: Utc::now(),
        }
    }
}
