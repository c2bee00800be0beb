//! Resource store abstraction.
//!
//! Every persisted record lives in a named collection behind a small REST
//! surface (list / get / create / replace / patch / delete). Services talk to
//! the [`ResourceStore`] trait; production wires in [`RestStore`], tests use
//! [`MemoryStore`]. Nothing above this module knows which one it got.

mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors from the backing resource store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store returned a body we could not decode.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The record does not exist in its collection.
    #[error("{collection} record not found: {id}")]
    NotFound {
        /// Collection name.
        collection: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// HTTP 429; retry after the given number of seconds.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other non-success HTTP status.
    #[error("store returned HTTP {status}: {detail}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        detail: String,
    },

    /// The store is down or refusing writes.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A record persisted in the resource store.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection path segment, e.g. `"orders"`.
    const COLLECTION: &'static str;

    /// The record's id as it appears in URLs.
    fn resource_id(&self) -> String;
}

/// Equality filter for list queries, rendered as `?key=value&...`.
#[derive(Debug, Clone, Default)]
pub struct Filter(Vec<(String, String)>);

impl Filter {
    /// An empty filter (matches every record).
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Add an equality condition.
    #[must_use]
    pub fn eq(mut self, key: &str, value: impl std::fmt::Display) -> Self {
        self.0.push((key.to_owned(), value.to_string()));
        self
    }

    /// The accumulated `(key, value)` pairs.
    #[must_use]
    pub fn entries(&self) -> &[(String, String)] {
        &self.0
    }
}

/// CRUD access to resource collections.
///
/// `Clone` is required so services can share one underlying client the way
/// `reqwest::Client` is shared (cheap handle, pooled inner).
pub trait ResourceStore: Clone + Send + Sync + 'static {
    /// List records matching `filter` (all records when empty).
    fn list<T: Resource>(
        &self,
        filter: &Filter,
    ) -> impl Future<Output = Result<Vec<T>, StoreError>> + Send;

    /// Fetch one record by id.
    fn get<T: Resource>(&self, id: &str) -> impl Future<Output = Result<T, StoreError>> + Send;

    /// Create a record. The caller supplies the id.
    fn create<T: Resource>(&self, record: &T)
    -> impl Future<Output = Result<T, StoreError>> + Send;

    /// Replace a record wholesale.
    fn replace<T: Resource>(
        &self,
        id: &str,
        record: &T,
    ) -> impl Future<Output = Result<T, StoreError>> + Send;

    /// Merge the given top-level fields into a record.
    fn patch<T: Resource>(
        &self,
        id: &str,
        partial: &serde_json::Value,
    ) -> impl Future<Output = Result<T, StoreError>> + Send;

    /// Delete a record by id.
    fn delete<T: Resource>(&self, id: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}
