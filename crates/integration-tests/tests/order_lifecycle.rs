//! End-to-end lifecycle of a shipped order, from cart to delivery.

use rust_decimal::Decimal;
use tech_haven_commerce::CommerceError;
use tech_haven_commerce::fulfillment::FulfillmentUpdate;
use tech_haven_core::{OrderStatus, TrackingLabel};
use tech_haven_integration_tests::{TestContext, ship_checkout};

#[tokio::test]
async fn test_ship_order_full_lifecycle_awards_points() {
    let ctx = TestContext::new();
    let customer = ctx.seed_customer(4, 0).await;
    let product = ctx.seed_product(1, 100, 10).await;

    let mut session = ctx.session_for(&customer);
    session.cart.add_item(&product, 2).unwrap();

    // 200 subtotal + 20 tax + 50 shipping
    let order = ctx
        .commerce
        .place_order(&mut session, &ship_checkout())
        .await
        .unwrap();
    assert_eq!(order.total, Decimal::from(270));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.tracking_status, TrackingLabel::Processing);
    assert!(session.cart.is_empty());

    // Advance along the ship path
    ctx.commerce
        .update_status(
            &mut session,
            order.id,
            FulfillmentUpdate::Ship {
                status: OrderStatus::Shipped,
                label: TrackingLabel::InTransit,
            },
            true,
        )
        .await
        .unwrap();

    let delivered = ctx
        .commerce
        .update_status(
            &mut session,
            order.id,
            FulfillmentUpdate::Ship {
                status: OrderStatus::Delivered,
                label: TrackingLabel::Delivered,
            },
            true,
        )
        .await
        .unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert!(delivered.loyalty_awarded_at.is_some());

    // floor(270 / 10) = 27, credited to the ledger and mirrored in session
    assert_eq!(ctx.commerce.loyalty_balance(customer.id).await.unwrap(), 27);
    assert_eq!(session.loyalty_points(), 27);
}

#[tokio::test]
async fn test_finalized_order_rejects_further_updates() {
    let ctx = TestContext::new();
    let customer = ctx.seed_customer(4, 0).await;
    let product = ctx.seed_product(1, 100, 10).await;

    let mut session = ctx.session_for(&customer);
    session.cart.add_item(&product, 1).unwrap();
    let order = ctx
        .commerce
        .place_order(&mut session, &ship_checkout())
        .await
        .unwrap();

    ctx.commerce
        .update_status(
            &mut session,
            order.id,
            FulfillmentUpdate::Ship {
                status: OrderStatus::Cancelled,
                label: TrackingLabel::Cancelled,
            },
            true,
        )
        .await
        .unwrap();

    let err = ctx
        .commerce
        .update_status(
            &mut session,
            order.id,
            FulfillmentUpdate::Ship {
                status: OrderStatus::Shipped,
                label: TrackingLabel::Shipped,
            },
            true,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::InvalidTransition { .. }));

    // Cancellation never awards points
    assert_eq!(ctx.commerce.loyalty_balance(customer.id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_placement_failure_preserves_cart() {
    let ctx = TestContext::new();
    let customer = ctx.seed_customer(4, 0).await;
    let product = ctx.seed_product(1, 100, 10).await;

    let mut session = ctx.session_for(&customer);
    session.cart.add_item(&product, 2).unwrap();

    ctx.store.fail_writes(true);
    let err = ctx
        .commerce
        .place_order(&mut session, &ship_checkout())
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::Store { .. }));
    assert_eq!(session.cart.unit_count(), 2);

    // The retry succeeds once the store is back
    ctx.store.fail_writes(false);
    let order = ctx
        .commerce
        .place_order(&mut session, &ship_checkout())
        .await
        .unwrap();
    assert_eq!(order.total, Decimal::from(270));
    assert!(session.cart.is_empty());
}

#[tokio::test]
async fn test_order_snapshot_is_immune_to_catalog_edits() {
    let ctx = TestContext::new();
    let customer = ctx.seed_customer(4, 0).await;
    let product = ctx.seed_product(1, 100, 10).await;

    let mut session = ctx.session_for(&customer);
    session.cart.add_item(&product, 2).unwrap();
    let order = ctx
        .commerce
        .place_order(&mut session, &ship_checkout())
        .await
        .unwrap();

    // Reprice and delete the product after placement
    ctx.commerce
        .catalog()
        .update_product(
            product.id,
            &tech_haven_commerce::models::ProductPatch {
                price: Some(Decimal::from(999)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    ctx.commerce.catalog().remove_product(product.id).await.unwrap();

    let fetched = ctx.commerce.orders().get_order(order.id).await.unwrap();
    assert_eq!(fetched.items[0].product.price, Decimal::from(100));
    assert_eq!(fetched.total, Decimal::from(270));
}
