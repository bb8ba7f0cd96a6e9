//! Claim history projection
//!
//! Flattens every policy's claim log into one chronological list for
//! display. Claims are ordered by service date; claims on the same date keep
//! document order (policies in order, then each policy's log in order).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{Amount, ClaimId, Owner};
use crate::claim::ClaimOutcome;
use crate::document::BenefitDocument;

/// A claim together with the policy it was made against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimView {
    pub claim_id: ClaimId,
    pub date: NaiveDate,
    pub amount: Amount,
    pub provider: String,
    pub payment: Amount,
    pub outcome: ClaimOutcome,
    pub policy: String,
    pub icon: String,
}

/// Projects all claims in a document into date order
pub fn project(document: &BenefitDocument) -> Vec<ClaimView> {
    let mut views: Vec<ClaimView> = document
        .policies
        .iter()
        .flat_map(|policy| {
            policy.claims().iter().map(move |claim| ClaimView {
                claim_id: claim.id,
                date: claim.date,
                amount: claim.amount,
                provider: claim.provider.clone(),
                payment: claim.payment,
                outcome: claim.outcome,
                policy: policy.title.clone(),
                icon: policy.icon.clone(),
            })
        })
        .collect();

    // sort_by_key is stable
    views.sort_by_key(|view| view.date);
    views
}

/// An owner's full claim history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimHistory {
    pub owner: Owner,
    pub claims: Vec<ClaimView>,
}

impl ClaimHistory {
    pub fn from_document(document: &BenefitDocument) -> Self {
        Self {
            owner: document.owner.clone(),
            claims: project(document),
        }
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn total_requested(&self) -> Amount {
        self.claims.iter().map(|c| c.amount).sum()
    }

    pub fn total_paid(&self) -> Amount {
        self.claims.iter().map(|c| c.payment).sum()
    }

    pub fn count_by_outcome(&self, outcome: ClaimOutcome) -> usize {
        self.claims.iter().filter(|c| c.outcome == outcome).count()
    }
}
