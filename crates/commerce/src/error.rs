//! Error types for the commerce engine.

use tech_haven_core::{CustomerId, OrderId, ProductId};
use thiserror::Error;

use crate::store::StoreError;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CommerceError>;

/// Top-level error for commerce operations.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// Input failed validation before any side effect ran.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. `"orders"`.
        entity: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// A fulfillment transition the state machine forbids.
    #[error("invalid transition for order {order_id}: {detail}")]
    InvalidTransition {
        /// The order whose update was rejected.
        order_id: OrderId,
        /// Why the transition is illegal.
        detail: String,
    },

    /// The cart asked for more units than the catalog has.
    #[error(
        "insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    OutOfStock {
        /// The product that ran short.
        product_id: ProductId,
        /// Units the cart would hold after the operation.
        requested: u32,
        /// Units the catalog snapshot reports.
        available: u32,
    },

    /// The backing resource store failed.
    #[error("store error during {operation}: {source}")]
    Store {
        /// The commerce operation that was underway.
        operation: &'static str,
        /// The underlying store failure.
        #[source]
        source: StoreError,
    },

    /// The per-customer award lock is unusable (a holder panicked).
    #[error("concurrent loyalty award in flight for customer {customer_id}")]
    ConcurrencyHazard {
        /// The customer whose ledger was being updated.
        customer_id: CustomerId,
    },
}

impl CommerceError {
    /// Adapter for `map_err` at store call sites.
    ///
    /// Store-level "not found" surfaces as [`CommerceError::NotFound`] so
    /// callers never have to dig through the `Store` variant for the common
    /// case.
    pub(crate) fn store(operation: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| match source {
            StoreError::NotFound { collection, id } => Self::NotFound {
                entity: collection,
                id,
            },
            other => Self::Store {
                operation,
                source: other,
            },
        }
    }
}
