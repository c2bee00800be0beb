//! The shopping cart and checkout totals.
//!
//! A cart is a pure value: no I/O, no store handle. Mutations go through the
//! methods here so the invariants hold at all times: one line per product,
//! every quantity at least 1, never above the stock snapshot taken when the
//! product was added.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tech_haven_core::{FulfillmentMode, ProductId};

use crate::config::CheckoutConfig;
use crate::error::{CommerceError, Result};
use crate::models::Product;

/// One cart line: a product snapshot plus a quantity.
///
/// The snapshot is flattened so the serialized form is the product document
/// with a `quantity` field, matching how orders store their items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Line subtotal (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// Checkout totals for a cart under a given fulfillment mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

/// A shopping cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The cart lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Add `delta` units of a product (negative values remove units).
    ///
    /// Re-adding a product merges into its existing line. A line whose
    /// quantity would drop to zero or below is removed. Adding to an absent
    /// line with a non-positive delta is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::OutOfStock`] if the resulting quantity would
    /// exceed the product's stock snapshot; the cart is left unchanged.
    pub fn add_item(&mut self, product: &Product, delta: i64) -> Result<()> {
        if let Some(index) = self.position(product.id) {
            let current = i64::from(self.items[index].quantity);
            let next = current + delta;
            if next <= 0 {
                self.items.remove(index);
                return Ok(());
            }
            let next = quantity_within_stock(product, next)?;
            self.items[index].quantity = next;
            // Refresh the snapshot so price edits since the first add are
            // reflected for the whole line
            self.items[index].product = product.clone();
        } else {
            if delta <= 0 {
                return Ok(());
            }
            let quantity = quantity_within_stock(product, delta)?;
            self.items.push(CartItem {
                product: product.clone(),
                quantity,
            });
        }
        Ok(())
    }

    /// Remove a product's line entirely. Absent lines are a no-op.
    pub fn remove_item(&mut self, product_id: ProductId) {
        self.items.retain(|item| item.product.id != product_id);
    }

    /// Set a line's quantity outright.
    ///
    /// Zero or negative removes the line. Absent lines are a no-op (there is
    /// no snapshot to price the line from).
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::OutOfStock`] if `quantity` exceeds the line's
    /// stock snapshot; the cart is left unchanged.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> Result<()> {
        let Some(index) = self.position(product_id) else {
            return Ok(());
        };
        if quantity <= 0 {
            self.items.remove(index);
            return Ok(());
        }
        let product = self.items[index].product.clone();
        self.items[index].quantity = quantity_within_stock(&product, quantity)?;
        Ok(())
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Compute checkout totals.
    ///
    /// - subtotal: sum of line totals
    /// - tax: subtotal times the tax rate, rounded to 2 decimal places
    /// - shipping: zero for pickup; for ship, zero above the free-shipping
    ///   threshold (strictly greater), the flat fee otherwise
    #[must_use]
    pub fn totals(&self, mode: FulfillmentMode, config: &CheckoutConfig) -> CartTotals {
        let subtotal: Decimal = self.items.iter().map(CartItem::line_total).sum();
        let tax = (subtotal * config.tax_rate).round_dp(2);
        let shipping = match mode {
            FulfillmentMode::Pickup => Decimal::ZERO,
            FulfillmentMode::Ship => {
                if subtotal > config.free_shipping_threshold {
                    Decimal::ZERO
                } else {
                    config.shipping_fee
                }
            }
        };
        CartTotals {
            subtotal,
            tax,
            shipping,
            total: subtotal + tax + shipping,
        }
    }

    /// Clone the lines for persisting onto an order.
    pub(crate) fn snapshot(&self) -> Vec<CartItem> {
        self.items.clone()
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product.id == product_id)
    }
}

/// Cap a requested quantity at the product's stock snapshot.
fn quantity_within_stock(product: &Product, requested: i64) -> Result<u32> {
    let requested_u32 = u32::try_from(requested).map_err(|_| CommerceError::OutOfStock {
        product_id: product.id,
        requested: u32::MAX,
        available: product.stock,
    })?;
    if requested_u32 > product.stock {
        return Err(CommerceError::OutOfStock {
            product_id: product.id,
            requested: requested_u32,
            available: product.stock,
        });
    }
    Ok(requested_u32)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: i32, price: i64, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("product-{id}"),
            price: Decimal::from(price),
            stock,
            category: "Audio".into(),
            rating: 4.0,
            description: String::new(),
            image: String::new(),
        }
    }

    #[test]
    fn test_add_merges_existing_line() {
        let mut cart = Cart::new();
        let p = product(1, 100, 10);
        cart.add_item(&p, 1).unwrap();
        cart.add_item(&p, 2).unwrap();
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn test_add_negative_delta_removes_at_zero() {
        let mut cart = Cart::new();
        let p = product(1, 100, 10);
        cart.add_item(&p, 2).unwrap();
        cart.add_item(&p, -1).unwrap();
        assert_eq!(cart.items()[0].quantity, 1);
        cart.add_item(&p, -1).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_absent_with_negative_delta_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 100, 10), -3).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_beyond_stock_rejected_and_cart_unchanged() {
        let mut cart = Cart::new();
        let p = product(1, 100, 2);
        cart.add_item(&p, 2).unwrap();
        let err = cart.add_item(&p, 1).unwrap_err();
        assert!(matches!(
            err,
            CommerceError::OutOfStock {
                requested: 3,
                available: 2,
                ..
            }
        ));
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_set_quantity_replaces_and_removes() {
        let mut cart = Cart::new();
        let p = product(1, 100, 10);
        cart.add_item(&p, 1).unwrap();
        cart.set_quantity(p.id, 5).unwrap();
        assert_eq!(cart.items()[0].quantity, 5);
        cart.set_quantity(p.id, 0).unwrap();
        assert!(cart.is_empty());
        // Absent line is a no-op
        cart.set_quantity(p.id, 3).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals_ship_under_threshold() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 100, 10), 2).unwrap();

        let totals = cart.totals(FulfillmentMode::Ship, &CheckoutConfig::default());
        assert_eq!(totals.subtotal, Decimal::from(200));
        assert_eq!(totals.tax, Decimal::new(2000, 2));
        assert_eq!(totals.shipping, Decimal::from(50));
        assert_eq!(totals.total, Decimal::from(270));
    }

    #[test]
    fn test_totals_free_shipping_strictly_above_threshold() {
        let config = CheckoutConfig::default();
        let mut cart = Cart::new();
        cart.add_item(&product(1, 500, 10), 1).unwrap();
        // Exactly at the threshold still pays shipping
        assert_eq!(
            cart.totals(FulfillmentMode::Ship, &config).shipping,
            Decimal::from(50)
        );

        cart.add_item(&product(2, 1, 10), 1).unwrap();
        assert_eq!(
            cart.totals(FulfillmentMode::Ship, &config).shipping,
            Decimal::ZERO
        );
    }

    #[test]
    fn test_totals_pickup_never_charges_shipping() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 100, 10), 1).unwrap();
        let totals = cart.totals(FulfillmentMode::Pickup, &CheckoutConfig::default());
        assert_eq!(totals.shipping, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::from(110));
    }

    #[test]
    fn test_cart_item_serde_flattens_product() {
        let item = CartItem {
            product: product(1, 100, 10),
            quantity: 2,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["quantity"], 2);
    }
}
