//! Fulfillment status transitions.
//!
//! Ship orders move through the canonical statuses with a consistent tracking
//! label; pickup orders move through the strict 3-phase machine and derive
//! their canonical pair from the phase. Terminal orders reject everything.
//! Reaching `delivered` triggers the loyalty award.

use chrono::Utc;
use tech_haven_core::{FulfillmentMode, OrderId, OrderStatus, PickupPhase, TrackingLabel};
use tracing::{info, instrument};

use crate::error::{CommerceError, Result};
use crate::loyalty::{AwardOutcome, LoyaltyService};
use crate::models::Order;
use crate::store::ResourceStore;

/// An admin's requested status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FulfillmentUpdate {
    /// Ship orders: an explicit `{status, label}` pair.
    Ship {
        status: OrderStatus,
        label: TrackingLabel,
    },
    /// Pickup orders: the target phase; status and label are derived.
    Pickup(PickupPhase),
}

impl FulfillmentUpdate {
    /// Which fulfillment mode this update applies to.
    #[must_use]
    pub const fn mode(&self) -> FulfillmentMode {
        match self {
            Self::Ship { .. } => FulfillmentMode::Ship,
            Self::Pickup(_) => FulfillmentMode::Pickup,
        }
    }
}

/// Fulfillment service over a resource store.
#[derive(Clone)]
pub struct FulfillmentService<S> {
    store: S,
    loyalty: LoyaltyService<S>,
}

impl<S: ResourceStore> FulfillmentService<S> {
    /// Create a new fulfillment service.
    pub const fn new(store: S, loyalty: LoyaltyService<S>) -> Self {
        Self { store, loyalty }
    }

    /// Apply a status update to an order.
    ///
    /// Validates the transition against the order's mode and current state,
    /// persists the new `{status, label}` pair, and, when the order just
    /// reached `delivered` with `award_points` set, credits loyalty points.
    /// The award outcome rides back so callers can refresh session state.
    ///
    /// # Errors
    ///
    /// - [`CommerceError::InvalidTransition`] for terminal orders or moves
    ///   the state machine forbids
    /// - [`CommerceError::Validation`] for a mode mismatch or an
    ///   inconsistent label
    /// - [`CommerceError::NotFound`] / [`CommerceError::Store`] from the
    ///   store
    #[instrument(skip(self, update), fields(order_id = %order_id))]
    pub async fn update_status(
        &self,
        order_id: OrderId,
        update: FulfillmentUpdate,
        award_points: bool,
    ) -> Result<(Order, Option<AwardOutcome>)> {
        let mut order: Order = self
            .store
            .get(&order_id.to_string())
            .await
            .map_err(CommerceError::store("update_status"))?;

        if order.status.is_terminal() {
            return Err(CommerceError::InvalidTransition {
                order_id,
                detail: format!("order is finalized ({})", order.status),
            });
        }

        if update.mode() != order.fulfillment_mode {
            return Err(CommerceError::Validation(format!(
                "a {} update cannot be applied to a {} order",
                update.mode(),
                order.fulfillment_mode
            )));
        }

        let (status, label) = next_state(&order, update)?;
        order.status = status;
        order.tracking_status = label;
        order.updated_at = Utc::now();

        let saved = self
            .store
            .replace(&order_id.to_string(), &order)
            .await
            .map_err(CommerceError::store("update_status"))?;

        info!(status = %saved.status, label = %saved.tracking_status, "order status updated");

        // The terminal guard above means this is always a fresh delivery
        let award = if saved.status == OrderStatus::Delivered && award_points {
            Some(self.loyalty.award_points(&saved).await?)
        } else {
            None
        };

        Ok((saved, award))
    }
}

/// Validate a requested update against the order's current state.
fn next_state(order: &Order, update: FulfillmentUpdate) -> Result<(OrderStatus, TrackingLabel)> {
    match update {
        FulfillmentUpdate::Ship { status, label } => {
            if !ship_transition_allowed(order.status, status) {
                return Err(CommerceError::InvalidTransition {
                    order_id: order.id,
                    detail: format!("cannot move from {} to {status}", order.status),
                });
            }
            if !label.is_consistent_with(status) {
                return Err(CommerceError::Validation(format!(
                    "label \"{label}\" is not consistent with status {status}"
                )));
            }
            Ok((status, label))
        }
        FulfillmentUpdate::Pickup(phase) => {
            let current = PickupPhase::from_canonical(order.status, order.tracking_status)
                .ok_or_else(|| {
                    CommerceError::Validation(format!(
                        "order {} does not carry a valid pickup state",
                        order.id
                    ))
                })?;
            if !pickup_transition_allowed(current, phase) {
                return Err(CommerceError::InvalidTransition {
                    order_id: order.id,
                    detail: format!("cannot move pickup phase backwards ({current:?} to {phase:?})"),
                });
            }
            Ok(phase.canonical())
        }
    }
}

/// Legal status moves for ship orders.
///
/// Forward along `pending -> shipped -> delivered`, cancellation only from
/// `pending`, and same-status moves so the label can advance within a phase.
const fn ship_transition_allowed(from: OrderStatus, to: OrderStatus) -> bool {
    matches!(
        (from, to),
        (OrderStatus::Pending, OrderStatus::Pending | OrderStatus::Shipped | OrderStatus::Cancelled)
            | (OrderStatus::Shipped, OrderStatus::Shipped | OrderStatus::Delivered)
    )
}

/// Legal phase moves for pickup orders: forward only, cancel from anywhere
/// non-terminal (the terminal guard has already run).
fn pickup_transition_allowed(from: PickupPhase, to: PickupPhase) -> bool {
    match (from.rank(), to.rank()) {
        (Some(_), None) => true,
        (Some(from_rank), Some(to_rank)) => to_rank >= from_rank,
        (None, _) => false,
    }
}
