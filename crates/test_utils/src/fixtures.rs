//! Pre-built Test Fixtures
//!
//! Consistent, predictable test data. Constructors that can fail panic,
//! since a broken fixture is a bug in the test suite.

use chrono::NaiveDate;
use core_kernel::{Amount, Owner, Percentage};
use domain_claims::{BenefitDocument, Policy};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixture for benefit owners
pub struct OwnerFixtures;

impl OwnerFixtures {
    pub fn ana() -> Owner {
        Owner::new("ana@example.com").expect("valid owner")
    }

    pub fn bob() -> Owner {
        Owner::new("bob@example.com").expect("valid owner")
    }

    /// An owner no store knows about
    pub fn unknown() -> Owner {
        Owner::new("nobody@example.com").expect("valid owner")
    }
}

/// Fixture for policies
pub struct PolicyFixtures;

impl PolicyFixtures {
    /// Dental: 80% covered up to 1000
    pub fn dental() -> Policy {
        Self::policy("Dental", "tooth", dec!(80), dec!(1000))
    }

    /// Vision: fully covered up to 300
    pub fn vision() -> Policy {
        Self::policy("Vision", "eye", dec!(100), dec!(300))
    }

    /// Physiotherapy: 50% covered up to 500
    pub fn physio() -> Policy {
        Self::policy("Physiotherapy", "run", dec!(50), dec!(500))
    }

    /// A policy whose limit is already fully used
    pub fn exhausted() -> Policy {
        Policy::restore(
            "Massage",
            "hand",
            Percentage::FULL,
            Amount::new(dec!(200)),
            Amount::new(dec!(200)),
            Vec::new(),
        )
        .expect("valid policy")
    }

    fn policy(title: &str, icon: &str, percent: Decimal, limit: Decimal) -> Policy {
        Policy::new(
            title,
            icon,
            Percentage::new(percent).expect("valid percentage"),
            Amount::new(limit),
        )
        .expect("valid policy")
    }
}

/// Fixture for benefit documents
pub struct DocumentFixtures;

impl DocumentFixtures {
    /// Ana's document: dental, vision and physiotherapy, nothing claimed
    pub fn ana() -> BenefitDocument {
        BenefitDocument::new(
            OwnerFixtures::ana(),
            vec![PolicyFixtures::dental(), PolicyFixtures::vision(), PolicyFixtures::physio()],
        )
        .expect("valid document")
    }

    /// Bob's document: dental and an exhausted massage policy
    pub fn bob() -> BenefitDocument {
        BenefitDocument::new(
            OwnerFixtures::bob(),
            vec![PolicyFixtures::dental(), PolicyFixtures::exhausted()],
        )
        .expect("valid document")
    }
}

/// Fixture for service dates
pub struct DateFixtures;

impl DateFixtures {
    pub fn service_date() -> NaiveDate {
        Self::day(2024, 6, 1)
    }

    pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }
}
