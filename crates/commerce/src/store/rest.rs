//! REST-backed resource store.
//!
//! A thin `reqwest` client over the resource API: one collection per record
//! type, JSON bodies, equality filters as query parameters.

use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use tracing::{debug, instrument};

use crate::config::StoreConfig;

use super::{Filter, Resource, ResourceStore, StoreError};

/// Client for the resource store's REST API.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct RestStore {
    inner: Arc<RestStoreInner>,
}

struct RestStoreInner {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl RestStore {
    /// Create a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the underlying HTTP client cannot be
    /// built.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            inner: Arc::new(RestStoreInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_owned(),
                api_token: config
                    .api_token
                    .as_ref()
                    .map(|token| token.expose_secret().to_owned()),
            }),
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{collection}", self.inner.base_url)
    }

    fn record_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{collection}/{id}", self.inner.base_url)
    }

    /// Send a request and decode the JSON body.
    ///
    /// Reads the body as text first so non-success statuses and decode
    /// failures can be logged with the raw payload.
    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        mut request: reqwest::RequestBuilder,
        collection: &'static str,
        id: Option<&str>,
    ) -> Result<T, StoreError> {
        if let Some(token) = &self.inner.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(StoreError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::NOT_FOUND
            && let Some(id) = id
        {
            return Err(StoreError::NotFound {
                collection,
                id: id.to_owned(),
            });
        }

        // Text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                collection,
                body = %response_text.chars().take(500).collect::<String>(),
                "resource store returned non-success status"
            );
            return Err(StoreError::Status {
                status: status.as_u16(),
                detail: response_text.chars().take(200).collect(),
            });
        }

        match serde_json::from_str(&response_text) {
            Ok(decoded) => Ok(decoded),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    collection,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "failed to parse resource store response"
                );
                Err(StoreError::Parse(e))
            }
        }
    }
}

impl ResourceStore for RestStore {
    #[instrument(skip(self, filter), fields(collection = T::COLLECTION))]
    async fn list<T: Resource>(&self, filter: &Filter) -> Result<Vec<T>, StoreError> {
        let mut request = self.inner.client.get(self.collection_url(T::COLLECTION));
        if !filter.entries().is_empty() {
            request = request.query(filter.entries());
        }
        debug!(conditions = filter.entries().len(), "listing records");
        self.send(request, T::COLLECTION, None).await
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn get<T: Resource>(&self, id: &str) -> Result<T, StoreError> {
        let request = self.inner.client.get(self.record_url(T::COLLECTION, id));
        self.send(request, T::COLLECTION, Some(id)).await
    }

    #[instrument(skip(self, record), fields(collection = T::COLLECTION))]
    async fn create<T: Resource>(&self, record: &T) -> Result<T, StoreError> {
        let request = self
            .inner
            .client
            .post(self.collection_url(T::COLLECTION))
            .json(record);
        self.send(request, T::COLLECTION, None).await
    }

    #[instrument(skip(self, record), fields(collection = T::COLLECTION))]
    async fn replace<T: Resource>(&self, id: &str, record: &T) -> Result<T, StoreError> {
        let request = self
            .inner
            .client
            .put(self.record_url(T::COLLECTION, id))
            .json(record);
        self.send(request, T::COLLECTION, Some(id)).await
    }

    #[instrument(skip(self, partial), fields(collection = T::COLLECTION))]
    async fn patch<T: Resource>(
        &self,
        id: &str,
        partial: &serde_json::Value,
    ) -> Result<T, StoreError> {
        let request = self
            .inner
            .client
            .patch(self.record_url(T::COLLECTION, id))
            .json(partial);
        self.send(request, T::COLLECTION, Some(id)).await
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn delete<T: Resource>(&self, id: &str) -> Result<(), StoreError> {
        let request = self.inner.client.delete(self.record_url(T::COLLECTION, id));
        // The store answers DELETE with an empty object
        let _body: serde_json::Value = self.send(request, T::COLLECTION, Some(id)).await?;
        Ok(())
    }
}
