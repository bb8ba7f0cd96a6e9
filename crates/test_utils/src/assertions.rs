//! Custom Test Assertions
//!
//! Assertion helpers for ledgers and claim history that report which policy
//! or claim broke, rather than a bare `assertion failed`.

use core_kernel::Amount;
use domain_claims::{BenefitDocument, ClaimView, Policy};
use rust_decimal::Decimal;

/// Asserts an amount equals the expected decimal value
pub fn assert_amount_eq(actual: Amount, expected: Decimal) {
    assert_eq!(
        actual.value(),
        expected,
        "Amount mismatch: actual={}, expected={}",
        actual,
        expected
    );
}

/// Asserts `0 <= amount_claimed <= claim_limit` for every policy
///
/// # Panics
///
/// Panics naming the first policy whose ledger is out of bounds
pub fn assert_ledger_invariants(document: &BenefitDocument) {
    for policy in &document.policies {
        assert!(
            !policy.amount_claimed().is_negative(),
            "Policy '{}' has negative amount claimed {}",
            policy.title,
            policy.amount_claimed()
        );
        assert!(
            policy.amount_claimed() <= policy.claim_limit,
            "Policy '{}' claimed {} beyond its limit {}",
            policy.title,
            policy.amount_claimed(),
            policy.claim_limit
        );
    }
    if let Err(e) = document.check_invariants() {
        panic!("Document for {} is inconsistent: {}", document.owner, e);
    }
}

/// Asserts the policy's total moved from `initial` by exactly the sum of
/// payments on its logged claims
pub fn assert_ledger_matches_log(policy: &Policy, initial: Amount) {
    let paid: Amount = policy.claims().iter().map(|c| c.payment).sum();
    assert_eq!(
        policy.amount_claimed(),
        initial + paid,
        "Policy '{}' claimed {} but started at {} and logged payments of {}",
        policy.title,
        policy.amount_claimed(),
        initial,
        paid
    );
}

/// Asserts history entries are in non-decreasing service date order
pub fn assert_history_ordered(history: &[ClaimView]) {
    for pair in history.windows(2) {
        assert!(
            pair[0].date <= pair[1].date,
            "History out of order: {} ({}) before {} ({})",
            pair[0].claim_id,
            pair[0].date,
            pair[1].claim_id,
            pair[1].date
        );
    }
}
