//! TechHaven commerce engine.
//!
//! This crate implements the storefront's commercial core: catalog access,
//! cart management, order placement, the ship / pickup fulfillment machines,
//! the loyalty ledger, and marketing campaigns.
//!
//! # Architecture
//!
//! All persistence goes through the [`store::ResourceStore`] trait. Production
//! uses [`store::RestStore`] (a thin reqwest client over the resource API);
//! tests use [`store::MemoryStore`]. Services are generic over the store and
//! own no global state, so every test gets an isolated world.
//!
//! [`Commerce`] is the composition root: it wires the services over one store
//! and exposes the cross-service operations (placing an order, advancing
//! fulfillment with its loyalty side effect, campaign ROI).
//!
//! # Modules
//!
//! - [`store`] - Resource store trait, REST client, in-memory test double
//! - [`models`] - Persisted records: products, customers, orders, campaigns
//! - [`catalog`] - Cached catalog reads and admin inventory mutations
//! - [`cart`] - Cart invariants and checkout totals
//! - [`orders`] - Order placement
//! - [`fulfillment`] - Status transitions for ship and pickup orders
//! - [`loyalty`] - Delivery-triggered, idempotent point awards
//! - [`campaigns`] - Campaign lifecycle, attribution, ROI
//! - [`session`] - Signed-in session with an optional JSON file mirror
//! - [`config`] - Environment-driven configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod campaigns;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fulfillment;
pub mod loyalty;
pub mod models;
pub mod orders;
pub mod session;
pub mod state;
pub mod store;

pub use error::{CommerceError, Result};
pub use state::Commerce;
