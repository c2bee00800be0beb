//! The loyalty ledger.
//!
//! Points are earned only when an order is delivered (or picked up): 1 point
//! per 10 currency units of the grand total, rounded down. Awards are
//! idempotent per order and serialized per customer, so a retried delivery
//! update can never double-credit and two orders delivering at once can never
//! lose an increment.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tech_haven_core::{CustomerId, OrderId, OrderStatus};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::error::{CommerceError, Result};
use crate::models::{Customer, Order};
use crate::store::ResourceStore;

/// Currency units per loyalty point.
const POINTS_DIVISOR: i64 = 10;

/// Points earned for an order total: `floor(total / 10)`.
#[must_use]
pub fn points_for(total: Decimal) -> u64 {
    (total / Decimal::from(POINTS_DIVISOR))
        .floor()
        .to_u64()
        .unwrap_or(0)
}

/// The result of an award attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AwardOutcome {
    pub customer_id: CustomerId,
    /// Points credited by this call (zero on a replayed award).
    pub earned: u64,
    /// The customer's ledger balance after the call.
    pub balance: u64,
    /// Whether this order had already been credited.
    pub already_awarded: bool,
}

/// Loyalty service over a resource store.
#[derive(Clone)]
pub struct LoyaltyService<S> {
    store: S,
    /// One async lock per customer; awards for the same customer run one at
    /// a time so read-modify-write on the balance never interleaves.
    locks: Arc<StdMutex<HashMap<CustomerId, Arc<Mutex<()>>>>>,
}

impl<S: ResourceStore> LoyaltyService<S> {
    /// Create a new loyalty service.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: Arc::new(StdMutex::new(HashMap::new())),
        }
    }

    /// Award points for a delivered order.
    ///
    /// Re-reads the order inside the per-customer critical section: if it is
    /// already marked as awarded this is a no-op reporting the current
    /// balance. Otherwise the customer's balance is credited first and the
    /// order marked second; a crash between the two leaves a retryable order,
    /// never silently dropped points.
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::Validation`] if the order is not delivered,
    /// [`CommerceError::ConcurrencyHazard`] if the customer's lock is
    /// poisoned, or store-level errors from the reads and writes.
    #[instrument(skip(self, order), fields(order_id = %order.id, customer_id = %order.user_id))]
    pub async fn award_points(&self, order: &Order) -> Result<AwardOutcome> {
        let customer_id = order.user_id;
        let lock = self.lock_for(customer_id)?;
        let _guard = lock.lock().await;

        // Fresh read; the caller's copy may predate a concurrent award
        let fresh: Order = self
            .store
            .get(&order.id.to_string())
            .await
            .map_err(CommerceError::store("award_points"))?;

        if fresh.loyalty_awarded_at.is_some() {
            debug!("points already credited for this order, replay is a no-op");
            let customer: Customer = self
                .store
                .get(&customer_id.to_string())
                .await
                .map_err(CommerceError::store("award_points"))?;
            return Ok(AwardOutcome {
                customer_id,
                earned: 0,
                balance: customer.loyalty_points,
                already_awarded: true,
            });
        }

        if fresh.status != OrderStatus::Delivered {
            return Err(CommerceError::Validation(format!(
                "points can only be awarded for a delivered order (order {} is {})",
                fresh.id, fresh.status
            )));
        }

        let earned = points_for(fresh.total);

        let mut customer: Customer = self
            .store
            .get(&customer_id.to_string())
            .await
            .map_err(CommerceError::store("award_points"))?;
        customer.loyalty_points += earned;
        let saved = self
            .store
            .replace(&customer_id.to_string(), &customer)
            .await
            .map_err(CommerceError::store("award_points"))?;

        // Mark the order after the credit lands; if this write fails the
        // order stays retryable and the replay check above catches nothing
        let mut marked = fresh;
        let now = Utc::now();
        marked.loyalty_awarded_at = Some(now);
        marked.updated_at = now;
        self.store
            .replace(&marked.id.to_string(), &marked)
            .await
            .map_err(CommerceError::store("award_points"))?;

        info!(earned, balance = saved.loyalty_points, "loyalty points credited");
        Ok(AwardOutcome {
            customer_id,
            earned,
            balance: saved.loyalty_points,
            already_awarded: false,
        })
    }

    /// Award points for an order by id.
    ///
    /// The admin retry path for orders that delivered without an award (for
    /// example after a crash between credit and mark).
    ///
    /// # Errors
    ///
    /// Same as [`Self::award_points`], plus [`CommerceError::NotFound`] for
    /// an unknown order.
    pub async fn award_for_order(&self, order_id: OrderId) -> Result<AwardOutcome> {
        let order: Order = self
            .store
            .get(&order_id.to_string())
            .await
            .map_err(CommerceError::store("award_for_order"))?;
        self.award_points(&order).await
    }

    /// The customer's current ledger balance.
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::NotFound`] for an unknown customer, or
    /// [`CommerceError::Store`] on store failure.
    pub async fn balance(&self, customer_id: CustomerId) -> Result<u64> {
        let customer: Customer = self
            .store
            .get(&customer_id.to_string())
            .await
            .map_err(CommerceError::store("balance"))?;
        Ok(customer.loyalty_points)
    }

    fn lock_for(&self, customer_id: CustomerId) -> Result<Arc<Mutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| CommerceError::ConcurrencyHazard { customer_id })?;
        Ok(locks
            .entry(customer_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }
}
