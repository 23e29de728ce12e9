//! Integration tests for the discount reconciliation protocol.
//!
//! These tests drive a booking session end to end against the mock discount
//! validator and mock order gateway:
//! 1. Synchronous pricing updates with an asynchronous discount lifecycle
//! 2. Debounced revalidation after pricing changes
//! 3. Stale responses never overwriting newer ones
//! 4. Submission carrying the discount code only while confirmed

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;

use travelcart::adapters::discount::MockDiscountValidator;
use travelcart::adapters::orders::MockOrderGateway;
use travelcart::application::{BookingSession, BookingSubmission, SessionConfig};
use travelcart::domain::booking::{BookingForm, Product, ProductPricing, ProductType};
use travelcart::domain::discount::DiscountStatus;
use travelcart::domain::foundation::ProductId;
use travelcart::domain::pricing::{Addon, AddonCatalog, PriceTier, TierTable};
use travelcart::ports::{CreatedOrder, DiscountCheck};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn open_trip_product() -> Product {
    Product {
        id: ProductId::try_new("open-trip-bromo-3d2n").unwrap(),
        product_type: ProductType::OpenTrip,
        name: "Mount Bromo Open Trip".into(),
        pricing: ProductPricing::Tiered(
            TierTable::try_new(vec![
                PriceTier {
                    min_pax: 1,
                    max_pax: Some(4),
                    price: Decimal::from(500_000u32),
                },
                PriceTier {
                    min_pax: 5,
                    max_pax: None,
                    price: Decimal::from(400_000u32),
                },
            ])
            .unwrap(),
        ),
        addons: AddonCatalog::try_new(vec![Addon {
            name: "Photographer".into(),
            price: Decimal::from(150_000u32),
        }])
        .unwrap(),
    }
}

fn session(validator: &MockDiscountValidator) -> BookingSession {
    BookingSession::new(
        open_trip_product(),
        Arc::new(validator.clone()),
        SessionConfig {
            debounce_window: Duration::from_millis(600),
            request_timeout: Duration::from_secs(10),
        },
    )
}

fn check(amount: u32) -> DiscountCheck {
    DiscountCheck {
        discount_amount: Decimal::from(amount),
        total_amount: Decimal::ZERO,
        message: None,
    }
}

fn valid_form() -> BookingForm {
    BookingForm {
        travel_date: chrono::NaiveDate::from_ymd_opt(2026, 9, 12),
        contact_name: "Ayu Lestari".into(),
        contact_email: "ayu@example.com".into(),
        contact_phone: "+62 812 0000 1111".into(),
        pickup_point: Some("Surabaya station".into()),
        notes: None,
    }
}

// =============================================================================
// The storefront's canonical pricing walkthrough
// =============================================================================

/// Three travelers with a photographer: 1,500,000 + 150,000. Applying
/// SALE10 (worth 200,000) brings the total to 1,450,000. Growing the group
/// to six keeps the old discount on display through the quiet period, then
/// the revalidated amount takes over.
#[tokio::test(start_paused = true)]
async fn pricing_walkthrough_with_discount_reconciliation() {
    let validator = MockDiscountValidator::new();
    validator.enqueue_ok(check(200_000));
    validator.enqueue_ok(check(255_000));
    let session = session(&validator);

    // Three travelers, photographer selected.
    session.set_unit_count(3).unwrap();
    session.toggle_addon("Photographer").unwrap();

    let totals = session.totals();
    assert_eq!(totals.subtotal, Decimal::from(1_500_000u32));
    assert_eq!(totals.addon_total, Decimal::from(150_000u32));
    assert_eq!(totals.grand_total, Decimal::from(1_650_000u32));

    // SALE10 confirms for 200,000.
    session.set_discount_code("SALE10");
    let discount = session.apply_code().await;
    assert_eq!(discount.status(), DiscountStatus::Applied);
    assert_eq!(session.totals().grand_total, Decimal::from(1_450_000u32));

    // Growing the group changes the tier (6 x 400,000). The subtotal moves
    // immediately; the old discount stays on display until the revalidation
    // lands.
    session.set_unit_count(6).unwrap();
    let totals = session.totals();
    assert_eq!(totals.subtotal, Decimal::from(2_400_000u32));
    assert_eq!(
        session.discount_state().confirmed_amount(),
        Decimal::from(200_000u32)
    );
    assert_eq!(validator.call_count(), 1);

    // After the quiet period the engine revalidates with the new inputs.
    tokio::time::sleep(Duration::from_millis(700)).await;
    tokio::task::yield_now().await;

    assert_eq!(validator.call_count(), 2);
    let revalidation = validator.last_request().unwrap();
    assert_eq!(revalidation.unit_count, 6);
    assert_eq!(revalidation.discount_code, "SALE10");
    assert_eq!(revalidation.selected_addons, vec!["Photographer".to_string()]);

    let state = session.discount_state();
    assert_eq!(state.confirmed_amount(), Decimal::from(255_000u32));
    assert_eq!(
        session.totals().grand_total,
        Decimal::from(2_295_000u32)
    );
}

// =============================================================================
// Debounce behavior
// =============================================================================

#[tokio::test(start_paused = true)]
async fn rapid_edits_collapse_into_one_revalidation() {
    let validator = MockDiscountValidator::new();
    validator.enqueue_ok(check(100_000));
    validator.enqueue_ok(check(120_000));
    let session = session(&validator);

    session.set_discount_code("SALE10");
    session.apply_code().await;

    // Five edits inside the window: the timer restarts each time.
    for count in 2..=6 {
        session.set_unit_count(count).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    tokio::time::sleep(Duration::from_millis(700)).await;
    tokio::task::yield_now().await;

    // One manual check plus exactly one revalidation, for the final state.
    assert_eq!(validator.call_count(), 2);
    assert_eq!(validator.last_request().unwrap().unit_count, 6);
}

#[tokio::test(start_paused = true)]
async fn rejected_discounts_are_not_revalidated() {
    let validator = MockDiscountValidator::new();
    validator.enqueue_ok(check(0));
    let session = session(&validator);

    session.set_discount_code("NOTYOURS");
    let state = session.apply_code().await;
    assert_eq!(state.status(), DiscountStatus::Rejected);

    session.set_unit_count(5).unwrap();
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(validator.call_count(), 1);
}

// =============================================================================
// Stale responses
// =============================================================================

#[tokio::test(start_paused = true)]
async fn slow_earlier_response_cannot_overwrite_newer_one() {
    let validator = MockDiscountValidator::new();
    validator.enqueue_ok_after(check(999_999), Duration::from_millis(900));
    validator.enqueue_ok(check(150_000));
    let session = session(&validator);

    session.set_discount_code("SALE10");
    let first = {
        let session = session.clone();
        tokio::spawn(async move { session.apply_code().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Re-entering the code supersedes the in-flight request.
    session.set_discount_code("SALE10");
    session.apply_code().await;
    assert_eq!(
        session.discount_state().confirmed_amount(),
        Decimal::from(150_000u32)
    );

    first.await.unwrap();
    assert_eq!(
        session.discount_state().confirmed_amount(),
        Decimal::from(150_000u32)
    );
}

#[tokio::test(start_paused = true)]
async fn response_for_old_code_text_never_lands_on_new_text() {
    let validator = MockDiscountValidator::new();
    validator.enqueue_ok_after(check(500_000), Duration::from_millis(400));
    let session = session(&validator);

    session.set_discount_code("OLDCODE");
    let inflight = {
        let session = session.clone();
        tokio::spawn(async move { session.apply_code().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Editing the text while the check is in flight invalidates it.
    session.set_discount_code("NEWCODE");
    inflight.await.unwrap();

    let state = session.discount_state();
    assert_eq!(state.status(), DiscountStatus::Idle);
    assert_eq!(state.confirmed_amount(), Decimal::ZERO);
}

// =============================================================================
// Submission
// =============================================================================

#[tokio::test]
async fn submission_carries_the_code_only_while_confirmed() {
    let validator = MockDiscountValidator::new();
    validator.enqueue_ok(check(200_000));
    let session = session(&validator);
    session.set_unit_count(3).unwrap();
    session.set_discount_code("SALE10");
    session.apply_code().await;

    let gateway = MockOrderGateway::new();
    gateway.enqueue_ok(CreatedOrder { id: "ord_777".into() });
    let submission = BookingSubmission::new(Arc::new(gateway.clone()));

    let order = submission.submit(&session, &valid_form()).await.unwrap();
    assert_eq!(order.id, "ord_777");

    let draft = gateway.last_draft().unwrap();
    assert_eq!(draft.discount_code.as_deref(), Some("SALE10"));
    assert_eq!(draft.unit_count, 3);
    assert_eq!(draft.grand_total, Decimal::from(1_300_000u32));
}

#[tokio::test]
async fn submission_omits_rejected_code_text() {
    let validator = MockDiscountValidator::new();
    validator.enqueue_ok(check(0));
    let session = session(&validator);
    session.set_discount_code("NOTYOURS");
    session.apply_code().await;

    let gateway = MockOrderGateway::new();
    gateway.enqueue_ok(CreatedOrder { id: "ord_778".into() });
    let submission = BookingSubmission::new(Arc::new(gateway.clone()));
    submission.submit(&session, &valid_form()).await.unwrap();

    let draft = gateway.last_draft().unwrap();
    assert_eq!(draft.discount_code, None);
}
