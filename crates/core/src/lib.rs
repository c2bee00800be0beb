//! TechHaven Core - Shared types library.
//!
//! This crate provides common types used across all TechHaven components:
//! - `commerce` - Cart, order lifecycle, fulfillment, loyalty, campaigns
//! - `integration-tests` - End-to-end scenario tests
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no storage access. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and the
//!   status vocabulary shared by the order lifecycle and fulfillment machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
