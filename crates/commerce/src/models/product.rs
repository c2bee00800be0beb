//! Catalog products.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tech_haven_core::ProductId;

use crate::store::Resource;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price in the deployment currency.
    pub price: Decimal,
    /// Units available. Cart additions are capped at this.
    pub stock: u32,
    pub category: String,
    pub rating: f32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

impl Resource for Product {
    const COLLECTION: &'static str = "products";

    fn resource_id(&self) -> String {
        self.id.to_string()
    }
}

/// Partial update for product fields, used by admin inventory tooling.
///
/// Only the set fields are sent; the store merges them into the record.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ProductPatch {
    /// A patch that only adjusts stock.
    #[must_use]
    pub fn stock(stock: u32) -> Self {
        Self {
            stock: Some(stock),
            ..Self::default()
        }
    }
}
