//! Tests for domain_claims public API

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{Amount, Owner, Percentage};

use domain_claims::adjudication::{adjudicate, adjudicate_in, decide, AdjudicationDecision};
use domain_claims::claim::{Claim, ClaimOutcome, ClaimRequest};
use domain_claims::document::BenefitDocument;
use domain_claims::error::ClaimError;
use domain_claims::history::{project, ClaimHistory};
use domain_claims::policy::{CoverageTerms, Policy};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn policy(title: &str, percent: Decimal, limit: Decimal, claimed: Decimal) -> Policy {
    Policy::restore(
        title,
        "",
        Percentage::new(percent).unwrap(),
        Amount::new(limit),
        Amount::new(claimed),
        Vec::new(),
    )
    .unwrap()
}

fn request(title: &str, amount: Decimal) -> ClaimRequest {
    ClaimRequest::new(title, Amount::new(amount), "Riverside Health", date(2024, 2, 14))
}

// ============================================================================
// Adjudication Tests
// ============================================================================

mod adjudication_tests {
    use super::*;

    #[test]
    fn test_full_case() {
        let decision = adjudicate(&policy("Dental", dec!(50), dec!(1000), dec!(0)), &request("Dental", dec!(100)))
            .unwrap();

        assert_eq!(decision.outcome, ClaimOutcome::Full);
        assert_eq!(decision.payment.value(), dec!(50));
        assert_eq!(decision.new_amount_claimed.value(), dec!(50));
    }

    #[test]
    fn test_partial_case() {
        let decision = adjudicate(&policy("Dental", dec!(100), dec!(500), dec!(400)), &request("Dental", dec!(1000)))
            .unwrap();

        assert_eq!(decision.outcome, ClaimOutcome::Partial);
        assert_eq!(decision.payment.value(), dec!(100));
        assert_eq!(decision.new_amount_claimed.value(), dec!(500));
    }

    #[test]
    fn test_denied_case() {
        let decision = adjudicate(&policy("Dental", dec!(100), dec!(500), dec!(500)), &request("Dental", dec!(75)))
            .unwrap();

        assert_eq!(decision.outcome, ClaimOutcome::Denied);
        assert!(decision.payment.is_zero());
        assert_eq!(decision.new_amount_claimed.value(), dec!(500));
    }

    #[test]
    fn test_decision_records_its_basis() {
        let decision = adjudicate(&policy("Dental", dec!(80), dec!(1000), dec!(120)), &request("Dental", dec!(10)))
            .unwrap();
        assert_eq!(decision.based_on_amount_claimed.value(), dec!(120));
        assert_eq!(decision.new_amount_claimed.value(), dec!(128));
    }

    #[test]
    fn test_same_inputs_same_decision() {
        let p = policy("Vision", dec!(65), dec!(300), dec!(250));
        let r = request("Vision", dec!(123.45));

        assert_eq!(adjudicate(&p, &r).unwrap(), adjudicate(&p, &r).unwrap());
    }

    #[test]
    fn test_unknown_policy_is_invalid_claim() {
        let doc = BenefitDocument::new(
            Owner::new("ana@example.com").unwrap(),
            vec![policy("Dental", dec!(50), dec!(1000), dec!(0))],
        )
        .unwrap();

        let err = adjudicate_in(&doc, &request("Chiropractic", dec!(10))).unwrap_err();
        assert!(err.is_invalid_claim());
        assert!(err.to_string().contains("Chiropractic"));
    }

    #[test]
    fn test_zero_amount_is_invalid_claim() {
        let err = adjudicate(&policy("Dental", dec!(50), dec!(1000), dec!(0)), &request("Dental", dec!(0)))
            .unwrap_err();
        assert!(matches!(err, ClaimError::InvalidClaim(_)));
    }

    #[test]
    fn test_fractional_eligibility() {
        let decision = decide(
            CoverageTerms {
                percent_covered: Percentage::new(dec!(33.3)).unwrap(),
                claim_limit: Amount::new(dec!(1000)),
                amount_claimed: Amount::zero(),
            },
            Amount::new(dec!(10)),
        )
        .unwrap();
        assert_eq!(decision.payment.value(), dec!(3.33));
    }
}

// ============================================================================
// History Tests
// ============================================================================

mod history_tests {
    use super::*;

    fn adjudicated(policy: &Policy, amount: Decimal, on: NaiveDate) -> (Claim, AdjudicationDecision) {
        let req = ClaimRequest::new(policy.title.clone(), Amount::new(amount), "Lakeside Optometry", on);
        let decision = adjudicate(policy, &req).unwrap();
        (decision.into_claim(&req), decision)
    }

    fn policy_with_history(title: &str, icon: &str, dates: &[NaiveDate]) -> Policy {
        let mut claimed = Amount::zero();
        let mut claims = Vec::new();
        for on in dates {
            let current = Policy::restore(
                title,
                icon,
                Percentage::FULL,
                Amount::new(dec!(1000)),
                claimed,
                Vec::new(),
            )
            .unwrap();
            let (claim, decision) = adjudicated(&current, dec!(20), *on);
            claimed = decision.new_amount_claimed;
            claims.push(claim);
        }
        Policy::restore(title, icon, Percentage::FULL, Amount::new(dec!(1000)), claimed, claims).unwrap()
    }

    #[test]
    fn test_history_is_date_ordered_across_policies() {
        let doc = BenefitDocument::new(
            Owner::new("ana@example.com").unwrap(),
            vec![
                policy_with_history("Dental", "tooth", &[date(2024, 3, 1), date(2024, 1, 15)]),
                policy_with_history("Vision", "eye", &[date(2024, 2, 1)]),
            ],
        )
        .unwrap();

        let views = project(&doc);

        assert_eq!(views.len(), doc.claim_count());
        assert!(views.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(views[0].policy, "Dental");
        assert_eq!(views[1].policy, "Vision");
        assert_eq!(views[1].icon, "eye");
    }

    #[test]
    fn test_history_serializes_outcomes() {
        let doc = BenefitDocument::new(
            Owner::new("ana@example.com").unwrap(),
            vec![policy_with_history("Dental", "tooth", &[date(2024, 3, 1)])],
        )
        .unwrap();

        let history = ClaimHistory::from_document(&doc);
        let json = serde_json::to_value(&history).unwrap();

        assert_eq!(json["owner"], "ana@example.com");
        assert_eq!(json["claims"][0]["outcome"], "FULL");
        assert_eq!(json["claims"][0]["policy"], "Dental");
    }
}

// ============================================================================
// Property Tests
// ============================================================================

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn terms_strategy() -> impl Strategy<Value = CoverageTerms> {
        (0u32..=100u32, 0i64..500_000i64, 0u32..=100u32).prop_map(|(pct, limit_minor, used)| {
            let limit = Amount::from_minor(limit_minor);
            let claimed = Amount::new(limit.value() * Decimal::from(used) / dec!(100));
            CoverageTerms {
                percent_covered: Percentage::new(Decimal::from(pct)).unwrap(),
                claim_limit: limit,
                amount_claimed: claimed,
            }
        })
    }

    proptest! {
        #[test]
        fn decision_never_exceeds_limit(terms in terms_strategy(), minor in 1i64..1_000_000i64) {
            let decision = decide(terms, Amount::from_minor(minor)).unwrap();

            prop_assert!(!decision.payment.is_negative());
            prop_assert!(decision.new_amount_claimed <= terms.claim_limit);
            prop_assert_eq!(decision.new_amount_claimed, terms.amount_claimed + decision.payment);
        }

        #[test]
        fn decision_is_deterministic(terms in terms_strategy(), minor in 1i64..1_000_000i64) {
            let amount = Amount::from_minor(minor);
            prop_assert_eq!(decide(terms, amount).unwrap(), decide(terms, amount).unwrap());
        }

        #[test]
        fn outcome_matches_payment(terms in terms_strategy(), minor in 1i64..1_000_000i64) {
            let amount = Amount::from_minor(minor);
            let decision = decide(terms, amount).unwrap();
            let eligible = terms.percent_covered.apply(amount).unwrap();

            match decision.outcome {
                ClaimOutcome::Denied => prop_assert!(decision.payment.is_zero()),
                ClaimOutcome::Full => prop_assert_eq!(decision.payment, eligible),
                ClaimOutcome::Partial => prop_assert!(decision.payment < eligible),
            }
        }
    }
}
