//! Property-Based Test Generators
//!
//! Proptest strategies producing values that satisfy the domain invariants.

use chrono::{Days, NaiveDate};
use core_kernel::{Amount, Percentage};
use domain_claims::{ClaimRequest, Policy};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for positive amounts in cents, up to 10,000.00
pub fn positive_amount_strategy() -> impl Strategy<Value = Amount> {
    (1i64..1_000_000i64).prop_map(Amount::from_minor)
}

/// Strategy for coverage percentages, including fractional ones like 33.3%
pub fn percentage_strategy() -> impl Strategy<Value = Percentage> {
    (0u32..=1000u32).prop_map(|tenths| {
        Percentage::new(Decimal::new(i64::from(tenths), 1)).expect("0..=100 by construction")
    })
}

/// Strategy for service dates within 2024
pub fn service_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u64..366u64).prop_map(|offset| {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
        start + Days::new(offset)
    })
}

/// Strategy for a policy with some of its limit already used
pub fn policy_strategy(title: &'static str) -> impl Strategy<Value = Policy> {
    (percentage_strategy(), 0i64..500_000i64, 0u32..=100u32).prop_map(
        move |(percent, limit_minor, used)| {
            let limit = Amount::from_minor(limit_minor);
            let claimed = Amount::new(limit.value() * Decimal::from(used) / Decimal::ONE_HUNDRED);
            Policy::restore(title, "", percent, limit, claimed, Vec::new())
                .expect("claimed within limit by construction")
        },
    )
}

/// Strategy for a well-formed claim against the given policy
pub fn claim_request_strategy(title: &'static str) -> impl Strategy<Value = ClaimRequest> {
    (positive_amount_strategy(), service_date_strategy())
        .prop_map(move |(amount, date)| ClaimRequest::new(title, amount, "Generated Provider", date))
}

/// Strategy for a sequence of claims against the same policy
pub fn claim_sequence_strategy(
    title: &'static str,
    max_len: usize,
) -> impl Strategy<Value = Vec<ClaimRequest>> {
    prop::collection::vec(claim_request_strategy(title), 1..=max_len.max(1))
}
