//! Shared harness for the end-to-end scenario tests.
//!
//! Every test gets an isolated world: a fresh [`MemoryStore`], the full
//! [`Commerce`] engine wired over it, and helpers for seeding catalog and
//! customer records. No external services are involved.

// Test harness code; panicking on bad fixtures is the point.
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use chrono::Utc;
use rust_decimal::Decimal;
use tech_haven_commerce::Commerce;
use tech_haven_commerce::config::CommerceConfig;
use tech_haven_commerce::models::{Address, CheckoutInput, Customer, Product, StoreLocation};
use tech_haven_commerce::session::{CurrentUser, Session};
use tech_haven_commerce::store::MemoryStore;
use tech_haven_core::{
    CustomerId, CustomerRole, FulfillmentMode, PaymentMethod, ProductId, StoreLocationId,
};

/// One isolated commerce world.
pub struct TestContext {
    pub commerce: Commerce<MemoryStore>,
    /// Direct handle to the same store, for seeding and white-box checks.
    pub store: MemoryStore,
}

impl TestContext {
    /// Build a fresh world.
    #[must_use]
    pub fn new() -> Self {
        init_tracing();
        let store = MemoryStore::new();
        let commerce = Commerce::new(
            CommerceConfig::for_base_url("memory://test"),
            store.clone(),
        );
        Self { commerce, store }
    }

    /// Seed a customer with a starting loyalty balance.
    pub async fn seed_customer(&self, id: i32, loyalty_points: u64) -> Customer {
        let customer = Customer {
            id: CustomerId::new(id),
            name: format!("customer-{id}"),
            email: format!("customer-{id}@example.com").parse().unwrap(),
            mobile_number: None,
            role: CustomerRole::Customer,
            loyalty_points,
            created_at: Utc::now(),
        };
        self.store.seed(&customer).await.unwrap();
        customer
    }

    /// Seed a catalog product.
    pub async fn seed_product(&self, id: i32, price: i64, stock: u32) -> Product {
        let product = Product {
            id: ProductId::new(id),
            name: format!("product-{id}"),
            price: Decimal::from(price),
            stock,
            category: "Audio".into(),
            rating: 4.2,
            description: String::new(),
            image: String::new(),
        };
        self.store.seed(&product).await.unwrap();
        product
    }

    /// A signed-in session for a seeded customer.
    #[must_use]
    pub fn session_for(&self, customer: &Customer) -> Session {
        let mut session = Session::new();
        session.login(
            CurrentUser {
                id: customer.id,
                name: customer.name.clone(),
                email: customer.email.clone(),
                role: customer.role,
            },
            customer.loyalty_points,
        );
        session
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Checkout input for a ship order to a complete address.
#[must_use]
pub fn ship_checkout() -> CheckoutInput {
    CheckoutInput {
        fulfillment_mode: FulfillmentMode::Ship,
        address: Some(Address {
            name: "Asha Rao".into(),
            line1: "12 MG Road".into(),
            city: "Bengaluru".into(),
            state: "KA".into(),
            pincode: "560001".into(),
        }),
        store: None,
        payment_method: PaymentMethod::Card,
    }
}

/// Checkout input for an in-store pickup order.
#[must_use]
pub fn pickup_checkout() -> CheckoutInput {
    CheckoutInput {
        fulfillment_mode: FulfillmentMode::Pickup,
        address: None,
        store: Some(StoreLocation {
            id: StoreLocationId::new(2),
            name: "TechHaven Koramangala".into(),
            address: "80 Feet Road, Koramangala".into(),
            distance: "2.5 km".into(),
        }),
        payment_method: PaymentMethod::Upi,
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
