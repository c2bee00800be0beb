//! In-memory resource store.
//!
//! Backs tests and local demos. Records are stored as raw JSON documents so
//! the same serde shapes flow through as with [`super::RestStore`], and write
//! failures can be injected to exercise error paths.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tokio::sync::RwLock;

use super::{Filter, Resource, ResourceStore, StoreError};

/// An in-memory resource store.
///
/// Clones share the same collections, mirroring how [`super::RestStore`]
/// clones share one backend.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    collections: RwLock<HashMap<&'static str, BTreeMap<String, Value>>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record directly, bypassing failure injection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Parse`] if the record cannot be serialized.
    pub async fn seed<T: Resource>(&self, record: &T) -> Result<(), StoreError> {
        let doc = serde_json::to_value(record)?;
        let mut collections = self.inner.collections.write().await;
        collections
            .entry(T::COLLECTION)
            .or_default()
            .insert(record.resource_id(), doc);
        Ok(())
    }

    /// Make every subsequent write fail with [`StoreError::Unavailable`].
    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("simulated write failure".into()));
        }
        Ok(())
    }
}

/// Compare a document field against a filter value, both as strings.
fn field_matches(doc: &Value, key: &str, expected: &str) -> bool {
    match doc.get(key) {
        Some(Value::String(s)) => s == expected,
        Some(other) => other.to_string() == expected,
        None => false,
    }
}

fn decode<T: Resource>(doc: Value) -> Result<T, StoreError> {
    serde_json::from_value(doc).map_err(StoreError::Parse)
}

impl ResourceStore for MemoryStore {
    async fn list<T: Resource>(&self, filter: &Filter) -> Result<Vec<T>, StoreError> {
        let collections = self.inner.collections.read().await;
        let Some(collection) = collections.get(T::COLLECTION) else {
            return Ok(Vec::new());
        };

        collection
            .values()
            .filter(|doc| {
                filter
                    .entries()
                    .iter()
                    .all(|(key, value)| field_matches(doc, key, value))
            })
            .cloned()
            .map(decode)
            .collect()
    }

    async fn get<T: Resource>(&self, id: &str) -> Result<T, StoreError> {
        let collections = self.inner.collections.read().await;
        let doc = collections
            .get(T::COLLECTION)
            .and_then(|collection| collection.get(id))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                collection: T::COLLECTION,
                id: id.to_owned(),
            })?;
        decode(doc)
    }

    async fn create<T: Resource>(&self, record: &T) -> Result<T, StoreError> {
        self.check_writable()?;
        let id = record.resource_id();
        let doc = serde_json::to_value(record)?;

        let mut collections = self.inner.collections.write().await;
        let collection = collections.entry(T::COLLECTION).or_default();
        if collection.contains_key(&id) {
            return Err(StoreError::Status {
                status: 409,
                detail: format!("duplicate id in {}: {id}", T::COLLECTION),
            });
        }
        collection.insert(id, doc.clone());
        decode(doc)
    }

    async fn replace<T: Resource>(&self, id: &str, record: &T) -> Result<T, StoreError> {
        self.check_writable()?;
        let doc = serde_json::to_value(record)?;

        let mut collections = self.inner.collections.write().await;
        let slot = collections
            .get_mut(T::COLLECTION)
            .and_then(|collection| collection.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: T::COLLECTION,
                id: id.to_owned(),
            })?;
        *slot = doc.clone();
        decode(doc)
    }

    async fn patch<T: Resource>(&self, id: &str, partial: &Value) -> Result<T, StoreError> {
        self.check_writable()?;

        let mut collections = self.inner.collections.write().await;
        let doc = collections
            .get_mut(T::COLLECTION)
            .and_then(|collection| collection.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: T::COLLECTION,
                id: id.to_owned(),
            })?;

        if let (Value::Object(existing), Value::Object(changes)) = (&mut *doc, partial) {
            for (key, value) in changes {
                existing.insert(key.clone(), value.clone());
            }
        }
        decode(doc.clone())
    }

    async fn delete<T: Resource>(&self, id: &str) -> Result<(), StoreError> {
        self.check_writable()?;

        let mut collections = self.inner.collections.write().await;
        collections
            .get_mut(T::COLLECTION)
            .and_then(|collection| collection.remove(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: T::COLLECTION,
                id: id.to_owned(),
            })?;
        Ok(())
    }
}
