//! Test Data Builders
//!
//! Builders for constructing test data with sensible defaults, so tests
//! only spell out the fields they care about.

use chrono::NaiveDate;
use core_kernel::{Amount, Owner, Percentage};
use domain_claims::{BenefitDocument, ClaimRequest, Policy};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::{DateFixtures, OwnerFixtures};

/// Builder for policies, optionally with a partly used limit
pub struct PolicyBuilder {
    title: String,
    icon: String,
    percent_covered: Decimal,
    claim_limit: Decimal,
    amount_claimed: Decimal,
}

impl Default for PolicyBuilder {
    fn default() -> Self {
        Self::new("Dental")
    }
}

impl PolicyBuilder {
    /// Starts a fully covered policy with a limit of 1000
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            icon: String::new(),
            percent_covered: dec!(100),
            claim_limit: dec!(1000),
            amount_claimed: Decimal::ZERO,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_percent_covered(mut self, percent: Decimal) -> Self {
        self.percent_covered = percent;
        self
    }

    pub fn with_claim_limit(mut self, limit: Decimal) -> Self {
        self.claim_limit = limit;
        self
    }

    /// Sets the total already paid out before any logged claim
    pub fn with_amount_claimed(mut self, claimed: Decimal) -> Self {
        self.amount_claimed = claimed;
        self
    }

    /// Builds the policy
    ///
    /// # Panics
    ///
    /// Panics if the configured values break the policy invariants
    pub fn build(self) -> Policy {
        Policy::restore(
            self.title,
            self.icon,
            Percentage::new(self.percent_covered).expect("percentage within 0..=100"),
            Amount::new(self.claim_limit),
            Amount::new(self.amount_claimed),
            Vec::new(),
        )
        .expect("policy within its limit")
    }
}

/// Builder for benefit documents
pub struct BenefitDocumentBuilder {
    owner: Owner,
    policies: Vec<Policy>,
}

impl Default for BenefitDocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BenefitDocumentBuilder {
    /// Starts an empty document for the default owner
    pub fn new() -> Self {
        Self {
            owner: OwnerFixtures::ana(),
            policies: Vec::new(),
        }
    }

    pub fn with_owner(mut self, owner: Owner) -> Self {
        self.owner = owner;
        self
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policies.push(policy);
        self
    }

    /// Builds the document
    ///
    /// # Panics
    ///
    /// Panics if two policies share a title
    pub fn build(self) -> BenefitDocument {
        BenefitDocument::new(self.owner, self.policies).expect("valid benefit document")
    }
}

/// Builder for claim requests
pub struct ClaimRequestBuilder {
    policy_title: String,
    amount: Decimal,
    provider: String,
    date: NaiveDate,
}

impl Default for ClaimRequestBuilder {
    fn default() -> Self {
        Self::new("Dental")
    }
}

impl ClaimRequestBuilder {
    /// Starts a request for 100 against the given policy
    pub fn new(policy_title: impl Into<String>) -> Self {
        Self {
            policy_title: policy_title.into(),
            amount: dec!(100),
            provider: "Main Street Clinic".to_string(),
            date: DateFixtures::service_date(),
        }
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn build(self) -> ClaimRequest {
        ClaimRequest::new(self.policy_title, Amount::new(self.amount), self.provider, self.date)
    }
}
