//! Catalog reads and admin inventory mutations.
//!
//! Reads go through a `moka` cache (5-minute TTL). Every mutation invalidates
//! the affected entries so admin edits show up on the next read.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tech_haven_core::ProductId;
use tracing::{debug, instrument};

use crate::error::{CommerceError, Result};
use crate::models::{Product, ProductPatch};
use crate::store::{Filter, ResourceStore, StoreError};

const CACHE_MAX_CAPACITY: u64 = 1000;
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    Product(ProductId),
    AllProducts,
}

#[derive(Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Arc<Vec<Product>>),
}

/// Catalog service over a resource store.
#[derive(Clone)]
pub struct CatalogService<S> {
    store: S,
    cache: Cache<CacheKey, CacheValue>,
}

impl<S: ResourceStore> CatalogService<S> {
    /// Create a new catalog service.
    #[must_use]
    pub fn new(store: S) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_MAX_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();
        Self { store, cache }
    }

    /// Fetch one product, from cache when possible.
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::NotFound`] if the product does not exist, or
    /// [`CommerceError::Store`] on store failure.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product> {
        if let Some(CacheValue::Product(product)) = self.cache.get(&CacheKey::Product(id)).await {
            debug!("cache hit for product");
            return Ok(*product);
        }

        let product: Product = self
            .store
            .get(&id.to_string())
            .await
            .map_err(CommerceError::store("get_product"))?;

        self.cache
            .insert(
                CacheKey::Product(id),
                CacheValue::Product(Box::new(product.clone())),
            )
            .await;
        Ok(product)
    }

    /// List the whole catalog, from cache when possible.
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::Store`] on store failure.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        if let Some(CacheValue::Products(products)) = self.cache.get(&CacheKey::AllProducts).await {
            debug!("cache hit for product list");
            return Ok((*products).clone());
        }

        let products: Vec<Product> = self
            .store
            .list(&Filter::new())
            .await
            .map_err(CommerceError::store("list_products"))?;

        self.cache
            .insert(
                CacheKey::AllProducts,
                CacheValue::Products(Arc::new(products.clone())),
            )
            .await;
        Ok(products)
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::Store`] on store failure.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_product(&self, product: &Product) -> Result<Product> {
        let created = self
            .store
            .create(product)
            .await
            .map_err(CommerceError::store("add_product"))?;
        self.cache.invalidate(&CacheKey::AllProducts).await;
        Ok(created)
    }

    /// Apply a partial update to a product.
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::NotFound`] if the product does not exist, or
    /// [`CommerceError::Store`] on store failure.
    #[instrument(skip(self, patch))]
    pub async fn update_product(&self, id: ProductId, patch: &ProductPatch) -> Result<Product> {
        let partial = serde_json::to_value(patch).map_err(|e| CommerceError::Store {
            operation: "update_product",
            source: StoreError::Parse(e),
        })?;

        let updated: Product = self
            .store
            .patch(&id.to_string(), &partial)
            .await
            .map_err(CommerceError::store("update_product"))?;

        self.cache.invalidate(&CacheKey::Product(id)).await;
        self.cache.invalidate(&CacheKey::AllProducts).await;
        Ok(updated)
    }

    /// Set a product's stock level.
    ///
    /// # Errors
    ///
    /// Same as [`Self::update_product`].
    pub async fn adjust_stock(&self, id: ProductId, stock: u32) -> Result<Product> {
        self.update_product(id, &ProductPatch::stock(stock)).await
    }

    /// Remove a product from the catalog.
    ///
    /// Existing orders keep their snapshots; only future carts are affected.
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::NotFound`] if the product does not exist, or
    /// [`CommerceError::Store`] on store failure.
    #[instrument(skip(self))]
    pub async fn remove_product(&self, id: ProductId) -> Result<()> {
        self.store
            .delete::<Product>(&id.to_string())
            .await
            .map_err(CommerceError::store("remove_product"))?;
        self.cache.invalidate(&CacheKey::Product(id)).await;
        self.cache.invalidate(&CacheKey::AllProducts).await;
        Ok(())
    }
}
