//! Persisted records.
//!
//! Each type here maps to one resource store collection via
//! [`crate::store::Resource`]. Field names serialize in camelCase to match
//! the store's documents.

pub mod campaign;
pub mod customer;
pub mod order;
pub mod product;

pub use campaign::{Campaign, CampaignInput, CampaignRoi};
pub use customer::Customer;
pub use order::{Address, CheckoutInput, Destination, Order, StoreLocation};
pub use product::{Product, ProductPatch};
