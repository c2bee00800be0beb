//! Order placement and lookup.

use chrono::Utc;
use tech_haven_core::{
    CampaignId, CustomerId, FulfillmentMode, OrderId, OrderStatus, TrackingLabel,
};
use tracing::{info, instrument};

use crate::cart::Cart;
use crate::config::CheckoutConfig;
use crate::error::{CommerceError, Result};
use crate::models::{CheckoutInput, Destination, Order};
use crate::store::{Filter, ResourceStore};

/// Order service over a resource store.
#[derive(Clone)]
pub struct OrderService<S> {
    store: S,
}

impl<S: ResourceStore> OrderService<S> {
    /// Create a new order service.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Place an order from the cart.
    ///
    /// Validates the destination, snapshots the cart lines, computes totals
    /// under the chosen fulfillment mode, and persists the order. The cart is
    /// cleared only after the store accepts the order; on any failure it is
    /// left intact so the customer can retry.
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::Validation`] for an empty cart or an
    /// unusable destination, or [`CommerceError::Store`] if persisting fails.
    #[instrument(skip_all, fields(user_id = %user_id, mode = %input.fulfillment_mode))]
    pub async fn place_order(
        &self,
        cart: &mut Cart,
        input: &CheckoutInput,
        user_id: CustomerId,
        campaign_id: Option<CampaignId>,
        checkout: &CheckoutConfig,
    ) -> Result<Order> {
        if cart.is_empty() {
            return Err(CommerceError::Validation("cart is empty".into()));
        }

        let destination = match input.fulfillment_mode {
            FulfillmentMode::Ship => {
                let address = input.address.as_ref().ok_or_else(|| {
                    CommerceError::Validation("a shipping address is required for ship orders".into())
                })?;
                if !address.is_complete() {
                    return Err(CommerceError::Validation(
                        "shipping address must include name, line 1, and PIN code".into(),
                    ));
                }
                Destination::Address(address.clone())
            }
            FulfillmentMode::Pickup => {
                let store_location = input.store.as_ref().ok_or_else(|| {
                    CommerceError::Validation("a pickup store must be selected".into())
                })?;
                Destination::Store(store_location.clone())
            }
        };

        let totals = cart.totals(input.fulfillment_mode, checkout);
        let (status, tracking_status) = initial_state(input.fulfillment_mode);
        let now = Utc::now();

        let order = Order {
            id: OrderId::generate(),
            user_id,
            items: cart.snapshot(),
            total: totals.total,
            status,
            tracking_status,
            fulfillment_mode: input.fulfillment_mode,
            campaign_id,
            shipping_address: destination,
            payment_method: input.payment_method,
            created_at: now,
            updated_at: now,
            loyalty_awarded_at: None,
        };

        let created = self
            .store
            .create(&order)
            .await
            .map_err(CommerceError::store("place_order"))?;

        cart.clear();
        info!(order_id = %created.id, total = %created.display_total().display(), "order placed");
        Ok(created)
    }

    /// Fetch one order by id.
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::NotFound`] if the order does not exist, or
    /// [`CommerceError::Store`] on store failure.
    pub async fn get_order(&self, id: OrderId) -> Result<Order> {
        self.store
            .get(&id.to_string())
            .await
            .map_err(CommerceError::store("get_order"))
    }

    /// List every order (admin view).
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::Store`] on store failure.
    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        self.store
            .list(&Filter::new())
            .await
            .map_err(CommerceError::store("list_orders"))
    }

    /// List one customer's orders.
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::Store`] on store failure.
    pub async fn list_orders_for(&self, customer_id: CustomerId) -> Result<Vec<Order>> {
        self.store
            .list(&Filter::new().eq("userId", customer_id))
            .await
            .map_err(CommerceError::store("list_orders_for"))
    }
}

/// The `{status, label}` pair a new order starts in.
///
/// Deliberately asymmetric: a pickup order enters the 3-phase machine at
/// "Order Placed", while a ship order enters the richer multi-step flow
/// already "Processing".
const fn initial_state(mode: FulfillmentMode) -> (OrderStatus, TrackingLabel) {
    match mode {
        FulfillmentMode::Ship => (OrderStatus::Pending, TrackingLabel::Processing),
        FulfillmentMode::Pickup => (OrderStatus::Pending, TrackingLabel::OrderPlaced),
    }
}
