//! Campaign attribution, lifecycle, and ROI scenarios.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tech_haven_commerce::campaigns::reconcile;
use tech_haven_commerce::fulfillment::FulfillmentUpdate;
use tech_haven_commerce::models::{Campaign, CampaignInput, Destination, Order};
use tech_haven_core::{
    CampaignId, CampaignStatus, CustomerId, FulfillmentMode, OrderId, OrderStatus, PaymentMethod,
    PickupPhase, TrackingLabel,
};
use tech_haven_integration_tests::{TestContext, pickup_checkout};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn campaign_input(name: &str, budget: i64, end: NaiveDate) -> CampaignInput {
    CampaignInput {
        name: name.into(),
        target_audience: "Returning customers".into(),
        budget: Decimal::from(budget),
        start_date: date(2026, 1, 1),
        end_date: end,
    }
}

/// An order seeded directly into the store with the given attribution.
fn attributed_order(campaign_id: CampaignId, status: OrderStatus, total: i64) -> Order {
    let now = Utc::now();
    let label = match status {
        OrderStatus::Delivered => TrackingLabel::Delivered,
        OrderStatus::Cancelled => TrackingLabel::Cancelled,
        OrderStatus::Shipped => TrackingLabel::Shipped,
        OrderStatus::Pending => TrackingLabel::OrderPlaced,
    };
    Order {
        id: OrderId::generate(),
        user_id: CustomerId::new(4),
        items: Vec::new(),
        total: Decimal::from(total),
        status,
        tracking_status: label,
        fulfillment_mode: FulfillmentMode::Ship,
        campaign_id: Some(campaign_id),
        shipping_address: Destination::Address(tech_haven_commerce::models::Address {
            name: "Asha Rao".into(),
            line1: "12 MG Road".into(),
            city: "Bengaluru".into(),
            state: "KA".into(),
            pincode: "560001".into(),
        }),
        payment_method: PaymentMethod::Card,
        created_at: now,
        updated_at: now,
        loyalty_awarded_at: None,
    }
}

#[tokio::test]
async fn test_roi_counts_only_delivered_orders() {
    let ctx = TestContext::new();
    let campaign = ctx
        .commerce
        .campaigns()
        .launch(campaign_input("Monsoon Sale", 500, date(2099, 12, 31)))
        .await
        .unwrap();

    ctx.store
        .seed(&attributed_order(campaign.id, OrderStatus::Delivered, 300))
        .await
        .unwrap();
    ctx.store
        .seed(&attributed_order(campaign.id, OrderStatus::Delivered, 700))
        .await
        .unwrap();
    // Pending and cancelled attribution contributes nothing
    ctx.store
        .seed(&attributed_order(campaign.id, OrderStatus::Pending, 10_000))
        .await
        .unwrap();
    ctx.store
        .seed(&attributed_order(campaign.id, OrderStatus::Cancelled, 10_000))
        .await
        .unwrap();

    let report = ctx.commerce.campaign_roi(campaign.id).await.unwrap();
    assert_eq!(report.revenue, Decimal::from(1000));
    assert_eq!(report.roi, Decimal::from(500));
    assert_eq!(report.order_count, 2);
}

#[tokio::test]
async fn test_roi_can_be_negative() {
    let ctx = TestContext::new();
    let campaign = ctx
        .commerce
        .campaigns()
        .launch(campaign_input("Flop Campaign", 500, date(2099, 12, 31)))
        .await
        .unwrap();

    let report = ctx.commerce.campaign_roi(campaign.id).await.unwrap();
    assert_eq!(report.revenue, Decimal::ZERO);
    assert_eq!(report.roi, Decimal::from(-500));
    assert_eq!(report.order_count, 0);
}

#[tokio::test]
async fn test_attribution_rides_on_the_next_order_only() {
    let ctx = TestContext::new();
    let customer = ctx.seed_customer(4, 0).await;
    let product = ctx.seed_product(1, 100, 10).await;
    let campaign = ctx
        .commerce
        .campaigns()
        .launch(campaign_input("Monsoon Sale", 500, date(2099, 12, 31)))
        .await
        .unwrap();

    let mut session = ctx.session_for(&customer);
    session.attribute_campaign(campaign.id);

    session.cart.add_item(&product, 1).unwrap();
    let first = ctx
        .commerce
        .place_order(&mut session, &pickup_checkout())
        .await
        .unwrap();
    assert_eq!(first.campaign_id, Some(campaign.id));

    // Attribution was consumed; the next order carries none
    session.cart.add_item(&product, 1).unwrap();
    let second = ctx
        .commerce
        .place_order(&mut session, &pickup_checkout())
        .await
        .unwrap();
    assert_eq!(second.campaign_id, None);
}

#[tokio::test]
async fn test_attribution_survives_a_failed_placement() {
    let ctx = TestContext::new();
    let customer = ctx.seed_customer(4, 0).await;
    let product = ctx.seed_product(1, 100, 10).await;
    let campaign = ctx
        .commerce
        .campaigns()
        .launch(campaign_input("Monsoon Sale", 500, date(2099, 12, 31)))
        .await
        .unwrap();

    let mut session = ctx.session_for(&customer);
    session.attribute_campaign(campaign.id);
    session.cart.add_item(&product, 1).unwrap();

    ctx.store.fail_writes(true);
    ctx.commerce
        .place_order(&mut session, &pickup_checkout())
        .await
        .unwrap_err();
    assert_eq!(session.active_campaign(), Some(campaign.id));

    ctx.store.fail_writes(false);
    let order = ctx
        .commerce
        .place_order(&mut session, &pickup_checkout())
        .await
        .unwrap();
    assert_eq!(order.campaign_id, Some(campaign.id));
}

#[tokio::test]
async fn test_attributed_delivery_feeds_roi_end_to_end() {
    let ctx = TestContext::new();
    let customer = ctx.seed_customer(4, 0).await;
    let product = ctx.seed_product(1, 100, 10).await;
    let campaign = ctx
        .commerce
        .campaigns()
        .launch(campaign_input("Monsoon Sale", 100, date(2099, 12, 31)))
        .await
        .unwrap();

    let mut session = ctx.session_for(&customer);
    session.attribute_campaign(campaign.id);
    session.cart.add_item(&product, 4).unwrap();

    // Pickup: 400 + 40 tax = 440
    let order = ctx
        .commerce
        .place_order(&mut session, &pickup_checkout())
        .await
        .unwrap();
    ctx.commerce
        .update_status(
            &mut session,
            order.id,
            FulfillmentUpdate::Pickup(PickupPhase::PickedUp),
            true,
        )
        .await
        .unwrap();

    let report = ctx.commerce.campaign_roi(campaign.id).await.unwrap();
    assert_eq!(report.revenue, Decimal::from(440));
    assert_eq!(report.roi, Decimal::from(340));
    assert_eq!(report.order_count, 1);
}

#[tokio::test]
async fn test_expired_campaign_completes_lazily_but_keeps_roi() {
    let ctx = TestContext::new();
    let campaign = ctx
        .commerce
        .campaigns()
        .launch(campaign_input("Last Winter", 500, date(2099, 12, 31)))
        .await
        .unwrap();

    // Push the end date into the past behind the service's back
    let expired = Campaign {
        end_date: date(2020, 1, 31),
        ..campaign
    };
    ctx.store.seed(&expired).await.unwrap();

    let listed = ctx.commerce.campaigns().list().await.unwrap();
    assert_eq!(listed[0].status, CampaignStatus::Completed);
    assert!(ctx.commerce.campaigns().list_active().await.unwrap().is_empty());

    ctx.store
        .seed(&attributed_order(expired.id, OrderStatus::Delivered, 700))
        .await
        .unwrap();
    let report = ctx.commerce.campaign_roi(expired.id).await.unwrap();
    assert_eq!(report.roi, Decimal::from(200));
}

#[tokio::test]
async fn test_archived_campaign_hidden_but_orders_keep_reference() {
    let ctx = TestContext::new();
    let campaign = ctx
        .commerce
        .campaigns()
        .launch(campaign_input("Monsoon Sale", 500, date(2099, 12, 31)))
        .await
        .unwrap();
    ctx.store
        .seed(&attributed_order(campaign.id, OrderStatus::Delivered, 700))
        .await
        .unwrap();

    ctx.commerce.campaigns().archive(campaign.id).await.unwrap();
    assert!(ctx.commerce.campaigns().list().await.unwrap().is_empty());

    // Historical ROI still answers from the retained references
    let report = ctx.commerce.campaign_roi(campaign.id).await.unwrap();
    assert_eq!(report.revenue, Decimal::from(700));
}

#[test]
fn test_reconcile_is_pure_and_date_inclusive() {
    let campaign = Campaign {
        id: CampaignId::generate(),
        name: "Boundary".into(),
        target_audience: String::new(),
        budget: Decimal::from(100),
        start_date: date(2026, 8, 1),
        end_date: date(2026, 8, 20),
        status: CampaignStatus::Active,
    };

    let on_end_date = reconcile(campaign.clone(), date(2026, 8, 20));
    assert_eq!(on_end_date.status, CampaignStatus::Active);

    let day_after = reconcile(campaign, date(2026, 8, 21));
    assert_eq!(day_after.status, CampaignStatus::Completed);
}
