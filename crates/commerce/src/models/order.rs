//! Orders and checkout input.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tech_haven_core::{
    CampaignId, CustomerId, FulfillmentMode, OrderId, OrderStatus, PaymentMethod, Price,
    StoreLocationId, TrackingLabel,
};

use crate::cart::CartItem;
use crate::store::Resource;

/// A shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub name: String,
    pub line1: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    pub pincode: String,
}

impl Address {
    /// Whether the fields checkout requires are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.line1.trim().is_empty()
            && !self.pincode.trim().is_empty()
    }
}

/// A physical store a pickup order can be collected from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreLocation {
    pub id: StoreLocationId,
    pub name: String,
    pub address: String,
    /// Display distance, e.g. `"2.5 km"`.
    #[serde(default)]
    pub distance: String,
}

impl Resource for StoreLocation {
    const COLLECTION: &'static str = "stores";

    fn resource_id(&self) -> String {
        self.id.to_string()
    }
}

/// Where an order goes: a customer address (ship) or a store (pickup).
///
/// Untagged: the variants have disjoint required fields, so the document
/// shape alone disambiguates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Destination {
    Store(StoreLocation),
    Address(Address),
}

/// A placed order.
///
/// `items` is a snapshot of the cart at placement; later catalog edits never
/// change what was bought. `loyalty_awarded_at` marks that points for this
/// order have been credited, making the award idempotent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: CustomerId,
    pub items: Vec<CartItem>,
    /// Grand total charged (subtotal + tax + shipping).
    pub total: Decimal,
    pub status: OrderStatus,
    pub tracking_status: TrackingLabel,
    pub fulfillment_mode: FulfillmentMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<CampaignId>,
    pub shipping_address: Destination,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loyalty_awarded_at: Option<DateTime<Utc>>,
}

impl Order {
    /// The grand total as a customer-facing price.
    #[must_use]
    pub const fn display_total(&self) -> Price {
        Price::from_amount(self.total)
    }
}

impl Resource for Order {
    const COLLECTION: &'static str = "orders";

    fn resource_id(&self) -> String {
        self.id.to_string()
    }
}

/// What the customer chooses at checkout.
#[derive(Debug, Clone)]
pub struct CheckoutInput {
    pub fulfillment_mode: FulfillmentMode,
    /// Required when `fulfillment_mode` is `Ship`.
    pub address: Option<Address>,
    /// Required when `fulfillment_mode` is `Pickup`.
    pub store: Option<StoreLocation>,
    pub payment_method: PaymentMethod,
}
