//! Status vocabulary for orders, fulfillment, and campaigns.
//!
//! Two parallel vocabularies describe an order's progress and must stay
//! synchronized: the canonical [`OrderStatus`] (small, stable, used for
//! filtering and metrics) and the customer-facing [`TrackingLabel`] (richer,
//! drawn from a fixed set). In-store pickup adds a third view, the strict
//! 3-phase [`PickupPhase`] machine, which maps onto the canonical pair via
//! [`PickupPhase::canonical`] rather than overloading the status field.

use serde::{Deserialize, Serialize};

/// Canonical order status.
///
/// The stable enum persisted on every order and used for filtering and
/// metrics. `Delivered` and `Cancelled` are terminal; a finalized order
/// rejects all further transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether this status is terminal (no further transitions allowed).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Shipped => write!(f, "shipped"),
            Self::Delivered => write!(f, "delivered"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// How an order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FulfillmentMode {
    /// Shipped to a customer-provided address.
    Ship,
    /// Picked up at a selected store location.
    Pickup,
}

impl std::fmt::Display for FulfillmentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ship => write!(f, "ship"),
            Self::Pickup => write!(f, "pickup"),
        }
    }
}

/// Customer-facing tracking label.
///
/// The fixed set of phrases an admin can attach to an order. Serialized as
/// the human-readable phrase, matching the store's documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackingLabel {
    #[serde(rename = "Order Placed")]
    OrderPlaced,
    #[serde(rename = "Payment Confirmed")]
    PaymentConfirmed,
    #[serde(rename = "Processing")]
    Processing,
    #[serde(rename = "Ready to Ship")]
    ReadyToShip,
    #[serde(rename = "Picked & Packed")]
    PickedAndPacked,
    #[serde(rename = "Shipped")]
    Shipped,
    #[serde(rename = "In Transit")]
    InTransit,
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    #[serde(rename = "Delivered")]
    Delivered,
    #[serde(rename = "Packed & Ready")]
    PackedAndReady,
    #[serde(rename = "Ready for Pickup")]
    ReadyForPickup,
    #[serde(rename = "Picked Up")]
    PickedUp,
    #[serde(rename = "Cancelled")]
    Cancelled,
}

impl TrackingLabel {
    /// Labels consistent with a canonical status in ship mode.
    ///
    /// The admin tool offers only these for the chosen status, so a persisted
    /// pair can never report one phase while displaying another.
    #[must_use]
    pub const fn labels_for(status: OrderStatus) -> &'static [Self] {
        match status {
            OrderStatus::Pending => &[
                Self::OrderPlaced,
                Self::PaymentConfirmed,
                Self::Processing,
                Self::ReadyToShip,
                Self::PickedAndPacked,
            ],
            OrderStatus::Shipped => &[Self::Shipped, Self::InTransit, Self::OutForDelivery],
            OrderStatus::Delivered => &[Self::Delivered],
            OrderStatus::Cancelled => &[Self::Cancelled],
        }
    }

    /// Whether this label may accompany the given canonical status (ship mode).
    #[must_use]
    pub fn is_consistent_with(&self, status: OrderStatus) -> bool {
        Self::labels_for(status).contains(self)
    }

    /// The human-readable phrase shown to the customer.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OrderPlaced => "Order Placed",
            Self::PaymentConfirmed => "Payment Confirmed",
            Self::Processing => "Processing",
            Self::ReadyToShip => "Ready to Ship",
            Self::PickedAndPacked => "Picked & Packed",
            Self::Shipped => "Shipped",
            Self::InTransit => "In Transit",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
            Self::PackedAndReady => "Packed & Ready",
            Self::ReadyForPickup => "Ready for Pickup",
            Self::PickedUp => "Picked Up",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for TrackingLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Customer-visible phase of an in-store pickup order.
///
/// A strict 3-phase machine, plus cancellation. Phases 1 and 2 both store
/// canonical `pending` (distinguished only by the tracking label); phase 3
/// stores `delivered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickupPhase {
    /// Phase 1: order placed, not yet packed.
    Pending,
    /// Phase 2: packed and ready for collection.
    Packed,
    /// Phase 3: collected by the customer (complete).
    PickedUp,
    /// Cancellation path, legal from any non-terminal phase.
    Cancelled,
}

impl PickupPhase {
    /// Map the phase onto the canonical `{status, label}` pair.
    #[must_use]
    pub const fn canonical(&self) -> (OrderStatus, TrackingLabel) {
        match self {
            Self::Pending => (OrderStatus::Pending, TrackingLabel::OrderPlaced),
            Self::Packed => (OrderStatus::Pending, TrackingLabel::PackedAndReady),
            Self::PickedUp => (OrderStatus::Delivered, TrackingLabel::PickedUp),
            Self::Cancelled => (OrderStatus::Cancelled, TrackingLabel::Cancelled),
        }
    }

    /// Recover the phase from a persisted canonical pair.
    ///
    /// Returns `None` for pairs no pickup order can carry. Used by admin
    /// tooling to preselect the current phase.
    #[must_use]
    pub const fn from_canonical(status: OrderStatus, label: TrackingLabel) -> Option<Self> {
        match (status, label) {
            (OrderStatus::Pending, TrackingLabel::PackedAndReady) => Some(Self::Packed),
            (OrderStatus::Pending, _) => Some(Self::Pending),
            (OrderStatus::Delivered, _) => Some(Self::PickedUp),
            (OrderStatus::Cancelled, _) => Some(Self::Cancelled),
            (OrderStatus::Shipped, _) => None,
        }
    }

    /// Position in the forward-only phase order. `None` for cancellation.
    #[must_use]
    pub const fn rank(&self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Packed => Some(1),
            Self::PickedUp => Some(2),
            Self::Cancelled => None,
        }
    }
}

/// Campaign lifecycle state.
///
/// `Active` transitions to `Completed` exactly once, when the end date
/// passes (applied lazily at read boundaries, no scheduler). `Archived` is
/// the soft delete: excluded from listings, but orders keep their campaign
/// reference for historical ROI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CampaignStatus {
    #[default]
    Active,
    Completed,
    Archived,
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Completed => write!(f, "Completed"),
            Self::Archived => write!(f, "Archived"),
        }
    }
}

/// Payment method recorded on an order. Recorded, not settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Upi,
    Cod,
}

/// Customer role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CustomerRole {
    #[default]
    Customer,
    Admin,
}
