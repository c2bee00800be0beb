//! End-to-end lifecycle of an in-store pickup order.

use rust_decimal::Decimal;
use tech_haven_commerce::CommerceError;
use tech_haven_commerce::fulfillment::FulfillmentUpdate;
use tech_haven_core::{OrderStatus, PickupPhase, TrackingLabel};
use tech_haven_integration_tests::{TestContext, pickup_checkout, ship_checkout};

#[tokio::test]
async fn test_pickup_order_three_phase_flow() {
    let ctx = TestContext::new();
    let customer = ctx.seed_customer(4, 0).await;
    let product = ctx.seed_product(1, 100, 10).await;

    let mut session = ctx.session_for(&customer);
    session.cart.add_item(&product, 4).unwrap();

    // 400 subtotal + 40 tax, no shipping for pickup
    let order = ctx
        .commerce
        .place_order(&mut session, &pickup_checkout())
        .await
        .unwrap();
    assert_eq!(order.total, Decimal::from(440));
    assert_eq!(order.tracking_status, TrackingLabel::OrderPlaced);

    // Phase 2: packed, still canonically pending
    let packed = ctx
        .commerce
        .update_status(
            &mut session,
            order.id,
            FulfillmentUpdate::Pickup(PickupPhase::Packed),
            true,
        )
        .await
        .unwrap();
    assert_eq!(packed.status, OrderStatus::Pending);
    assert_eq!(packed.tracking_status, TrackingLabel::PackedAndReady);
    assert_eq!(ctx.commerce.loyalty_balance(customer.id).await.unwrap(), 0);

    // Phase 3: picked up counts as delivered and triggers the award
    let picked_up = ctx
        .commerce
        .update_status(
            &mut session,
            order.id,
            FulfillmentUpdate::Pickup(PickupPhase::PickedUp),
            true,
        )
        .await
        .unwrap();
    assert_eq!(picked_up.status, OrderStatus::Delivered);
    assert_eq!(picked_up.tracking_status, TrackingLabel::PickedUp);
    assert_eq!(ctx.commerce.loyalty_balance(customer.id).await.unwrap(), 44);
    assert_eq!(session.loyalty_points(), 44);
}

#[tokio::test]
async fn test_pickup_points_use_floor_division() {
    let ctx = TestContext::new();
    let customer = ctx.seed_customer(4, 0).await;
    let product = ctx.seed_product(1, 95, 10).await;

    let mut session = ctx.session_for(&customer);
    session.cart.add_item(&product, 1).unwrap();

    // 95 + 9.50 tax = 104.50; floor(104.50 / 10) = 10
    let order = ctx
        .commerce
        .place_order(&mut session, &pickup_checkout())
        .await
        .unwrap();
    assert_eq!(order.total, Decimal::new(104_50, 2));

    ctx.commerce
        .update_status(
            &mut session,
            order.id,
            FulfillmentUpdate::Pickup(PickupPhase::PickedUp),
            true,
        )
        .await
        .unwrap();
    assert_eq!(ctx.commerce.loyalty_balance(customer.id).await.unwrap(), 10);
}

#[tokio::test]
async fn test_pickup_phase_cannot_move_backwards() {
    let ctx = TestContext::new();
    let customer = ctx.seed_customer(4, 0).await;
    let product = ctx.seed_product(1, 100, 10).await;

    let mut session = ctx.session_for(&customer);
    session.cart.add_item(&product, 1).unwrap();
    let order = ctx
        .commerce
        .place_order(&mut session, &pickup_checkout())
        .await
        .unwrap();

    ctx.commerce
        .update_status(
            &mut session,
            order.id,
            FulfillmentUpdate::Pickup(PickupPhase::Packed),
            true,
        )
        .await
        .unwrap();

    let err = ctx
        .commerce
        .update_status(
            &mut session,
            order.id,
            FulfillmentUpdate::Pickup(PickupPhase::Pending),
            true,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::InvalidTransition { .. }));
}

#[tokio::test]
async fn test_pickup_cancel_from_packed_is_terminal() {
    let ctx = TestContext::new();
    let customer = ctx.seed_customer(4, 0).await;
    let product = ctx.seed_product(1, 100, 10).await;

    let mut session = ctx.session_for(&customer);
    session.cart.add_item(&product, 1).unwrap();
    let order = ctx
        .commerce
        .place_order(&mut session, &pickup_checkout())
        .await
        .unwrap();

    ctx.commerce
        .update_status(
            &mut session,
            order.id,
            FulfillmentUpdate::Pickup(PickupPhase::Packed),
            true,
        )
        .await
        .unwrap();

    let cancelled = ctx
        .commerce
        .update_status(
            &mut session,
            order.id,
            FulfillmentUpdate::Pickup(PickupPhase::Cancelled),
            true,
        )
        .await
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.tracking_status, TrackingLabel::Cancelled);

    let err = ctx
        .commerce
        .update_status(
            &mut session,
            order.id,
            FulfillmentUpdate::Pickup(PickupPhase::PickedUp),
            true,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::InvalidTransition { .. }));
    assert_eq!(ctx.commerce.loyalty_balance(customer.id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_vocabularies_do_not_cross_modes() {
    let ctx = TestContext::new();
    let customer = ctx.seed_customer(4, 0).await;
    let product = ctx.seed_product(1, 100, 10).await;

    let mut session = ctx.session_for(&customer);
    session.cart.add_item(&product, 1).unwrap();
    let pickup_order = ctx
        .commerce
        .place_order(&mut session, &pickup_checkout())
        .await
        .unwrap();

    // A ship-vocabulary update against a pickup order is rejected
    let err = ctx
        .commerce
        .update_status(
            &mut session,
            pickup_order.id,
            FulfillmentUpdate::Ship {
                status: OrderStatus::Shipped,
                label: TrackingLabel::Shipped,
            },
            true,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::Validation(_)));

    session.cart.add_item(&product, 1).unwrap();
    let ship_order = ctx
        .commerce
        .place_order(&mut session, &ship_checkout())
        .await
        .unwrap();

    let err = ctx
        .commerce
        .update_status(
            &mut session,
            ship_order.id,
            FulfillmentUpdate::Pickup(PickupPhase::Packed),
            true,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::Validation(_)));
}
