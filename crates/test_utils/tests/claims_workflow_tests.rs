//! End-to-end claim workflows against the in-memory claim store

use std::sync::Arc;

use rust_decimal_macros::dec;

use core_kernel::Amount;
use domain_claims::{ClaimError, ClaimOutcome, ClaimsService, InMemoryClaimStore};
use test_utils::{
    assert_amount_eq, assert_history_ordered, assert_ledger_invariants, assert_ledger_matches_log,
    init_test_tracing, BenefitDocumentBuilder, ClaimRequestBuilder, DateFixtures, DocumentFixtures,
    OwnerFixtures, PolicyBuilder,
};

async fn service_for(documents: Vec<domain_claims::BenefitDocument>) -> (ClaimsService, Arc<InMemoryClaimStore>) {
    init_test_tracing();
    let store = Arc::new(InMemoryClaimStore::with_documents(documents).await);
    (ClaimsService::with_defaults(store.clone()), store)
}

// ============================================================================
// Adjudication outcomes through the service
// ============================================================================

#[tokio::test]
async fn test_vision_limit_runs_from_full_to_partial_to_denied() {
    let (service, store) = service_for(vec![DocumentFixtures::ana()]).await;
    let ana = OwnerFixtures::ana();

    let first = service
        .submit_claim(&ana, ClaimRequestBuilder::new("Vision").with_amount(dec!(250)).build())
        .await
        .unwrap();
    assert_eq!(first.outcome, ClaimOutcome::Full);
    assert_amount_eq(first.payment, dec!(250));
    assert_amount_eq(first.remaining, dec!(50));

    let second = service
        .submit_claim(&ana, ClaimRequestBuilder::new("Vision").with_amount(dec!(100)).build())
        .await
        .unwrap();
    assert_eq!(second.outcome, ClaimOutcome::Partial);
    assert_amount_eq(second.payment, dec!(50));
    assert!(second.remaining.is_zero());

    let third = service
        .submit_claim(&ana, ClaimRequestBuilder::new("Vision").with_amount(dec!(10)).build())
        .await
        .unwrap();
    assert_eq!(third.outcome, ClaimOutcome::Denied);
    assert!(third.payment.is_zero());

    let stored = store.snapshot(&ana).await.unwrap();
    let vision = stored.policy("Vision").unwrap();
    assert_eq!(vision.claims().len(), 3);
    assert_amount_eq(vision.amount_claimed(), dec!(300));
    assert_ledger_matches_log(vision, Amount::zero());
    assert_ledger_invariants(&stored);
}

#[tokio::test]
async fn test_coverage_percentage_scales_payment() {
    let (service, _) = service_for(vec![DocumentFixtures::ana()]).await;

    let receipt = service
        .submit_claim(&OwnerFixtures::ana(), ClaimRequestBuilder::new("Dental").with_amount(dec!(125)).build())
        .await
        .unwrap();

    assert_eq!(receipt.outcome, ClaimOutcome::Full);
    assert_amount_eq(receipt.payment, dec!(100));
    assert_amount_eq(receipt.remaining, dec!(900));
}

#[tokio::test]
async fn test_partial_against_previously_used_limit() {
    let document = BenefitDocumentBuilder::new()
        .with_policy(
            PolicyBuilder::new("Dental")
                .with_claim_limit(dec!(500))
                .with_amount_claimed(dec!(400))
                .build(),
        )
        .build();
    let (service, store) = service_for(vec![document]).await;
    let ana = OwnerFixtures::ana();

    let receipt = service
        .submit_claim(&ana, ClaimRequestBuilder::new("Dental").with_amount(dec!(1000)).build())
        .await
        .unwrap();

    assert_eq!(receipt.outcome, ClaimOutcome::Partial);
    assert_amount_eq(receipt.payment, dec!(100));

    let dental = store.snapshot(&ana).await.unwrap().policy("Dental").cloned().unwrap();
    assert_amount_eq(dental.amount_claimed(), dec!(500));
    assert_ledger_matches_log(&dental, Amount::new(dec!(400)));
}

#[tokio::test]
async fn test_exhausted_policy_denies_and_still_logs() {
    let (service, store) = service_for(vec![DocumentFixtures::bob()]).await;
    let bob = OwnerFixtures::bob();

    let receipt = service
        .submit_claim(&bob, ClaimRequestBuilder::new("Massage").with_amount(dec!(75)).build())
        .await
        .unwrap();

    assert_eq!(receipt.outcome, ClaimOutcome::Denied);
    assert!(receipt.payment.is_zero());

    let massage = store.snapshot(&bob).await.unwrap().policy("Massage").cloned().unwrap();
    assert_eq!(massage.claims().len(), 1);
    assert_amount_eq(massage.amount_claimed(), dec!(200));
}

// ============================================================================
// Rejected submissions
// ============================================================================

#[tokio::test]
async fn test_rejected_claims_leave_document_untouched() {
    let (service, store) = service_for(vec![DocumentFixtures::ana()]).await;
    let ana = OwnerFixtures::ana();

    let unknown = service
        .submit_claim(&ana, ClaimRequestBuilder::new("Acupuncture").build())
        .await
        .unwrap_err();
    assert!(unknown.is_invalid_claim());

    let zero = service
        .submit_claim(&ana, ClaimRequestBuilder::new("Dental").with_amount(dec!(0)).build())
        .await
        .unwrap_err();
    assert!(zero.is_invalid_claim());

    assert_eq!(store.successful_saves(), 0);
    assert_eq!(store.snapshot(&ana).await.unwrap(), DocumentFixtures::ana());
}

#[tokio::test]
async fn test_unknown_owner() {
    let (service, _) = service_for(vec![DocumentFixtures::ana()]).await;

    let err = service
        .submit_claim(&OwnerFixtures::unknown(), ClaimRequestBuilder::new("Dental").build())
        .await
        .unwrap_err();

    assert!(matches!(err, ClaimError::NotFound(_)));
}

#[tokio::test]
async fn test_owners_are_isolated() {
    let (service, store) = service_for(vec![DocumentFixtures::ana(), DocumentFixtures::bob()]).await;

    service
        .submit_claim(&OwnerFixtures::ana(), ClaimRequestBuilder::new("Dental").build())
        .await
        .unwrap();

    assert_eq!(store.snapshot(&OwnerFixtures::bob()).await.unwrap(), DocumentFixtures::bob());
}

// ============================================================================
// History
// ============================================================================

#[tokio::test]
async fn test_history_spans_policies_in_date_order() {
    let (service, _) = service_for(vec![DocumentFixtures::ana()]).await;
    let ana = OwnerFixtures::ana();

    let submissions = [
        ("Physiotherapy", DateFixtures::day(2024, 5, 20)),
        ("Dental", DateFixtures::day(2024, 2, 1)),
        ("Vision", DateFixtures::day(2024, 3, 15)),
        ("Dental", DateFixtures::day(2024, 1, 10)),
    ];
    for (title, on) in submissions {
        service
            .submit_claim(&ana, ClaimRequestBuilder::new(title).with_amount(dec!(60)).on(on).build())
            .await
            .unwrap();
    }

    let history = service.get_history(&ana).await.unwrap();

    assert_eq!(history.len(), submissions.len());
    assert_history_ordered(&history.claims);
    assert_eq!(history.claims[0].date, DateFixtures::day(2024, 1, 10));
    assert_eq!(history.claims[0].policy, "Dental");
    assert_eq!(history.claims[0].icon, "tooth");
    assert_eq!(history.claims[3].policy, "Physiotherapy");
    assert_amount_eq(history.total_requested(), dec!(240));
    // 80% + 80% + 100% + 50% of 60
    assert_amount_eq(history.total_paid(), dec!(186));
}

#[tokio::test]
async fn test_history_for_document_without_claims() {
    let (service, _) = service_for(vec![DocumentFixtures::ana()]).await;

    let history = service.get_history(&OwnerFixtures::ana()).await.unwrap();

    assert!(history.is_empty());
    assert_eq!(history.owner, OwnerFixtures::ana());
}

#[tokio::test]
async fn test_receipt_serializes_outcome() {
    let (service, _) = service_for(vec![DocumentFixtures::bob()]).await;

    let receipt = service
        .submit_claim(&OwnerFixtures::bob(), ClaimRequestBuilder::new("Massage").build())
        .await
        .unwrap();
    let json = serde_json::to_value(&receipt).unwrap();

    assert_eq!(json["outcome"], "DENIED");
    assert_eq!(json["policy_title"], "Massage");
    assert_eq!(json["attempts"], 1);
}
