//! Client for the remote configuration store.
//!
//! The store is a hard dependency: anything other than a clean answer is
//! reported as an error for the caller to turn into "service unavailable".
//! Documents are returned raw; sanitizing and decoding happen downstream.

use async_trait::async_trait;
use reqwest::Url;
use setuphub_core::types::RawDocument;

use crate::error::UpstreamError;
use crate::http::{endpoint, parse_base_url, parse_json};

const SERVICE: &str = "configuration store";

/// Read access to configuration documents.
#[async_trait]
pub trait ConfigLookup: Send + Sync + 'static {
    /// Fetch one document. `Ok(None)` when the store reports it absent.
    async fn get_by_id(&self, config_id: &str) -> Result<Option<RawDocument>, UpstreamError>;

    /// Every document whose game name contains `game` (case-insensitive).
    async fn list_by_game(&self, game: &str) -> Result<Vec<RawDocument>, UpstreamError>;
}

/// [`ConfigLookup`] over the configuration store's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpConfigClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpConfigClient {
    /// * `base_url` - e.g. `http://configs-service:8000`.
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self, UpstreamError> {
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
        })
    }
}

#[async_trait]
impl ConfigLookup for HttpConfigClient {
    async fn get_by_id(&self, config_id: &str) -> Result<Option<RawDocument>, UpstreamError> {
        let url = endpoint(&self.base_url, &["configs", config_id]);
        // Reads made on behalf of aggregation must not bump the view counter.
        let response = self
            .client
            .get(url)
            .query(&[("increment", "false")])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let document: RawDocument = parse_json(SERVICE, response).await?;
        if document.is_null() {
            return Ok(None);
        }
        Ok(Some(document))
    }

    async fn list_by_game(&self, game: &str) -> Result<Vec<RawDocument>, UpstreamError> {
        let url = endpoint(&self.base_url, &["configs", ""]);
        let response = self
            .client
            .get(url)
            .query(&[("game", game)])
            .send()
            .await?;

        let documents: Vec<RawDocument> = parse_json(SERVICE, response).await?;
        tracing::debug!(game, count = documents.len(), "Fetched configurations by game");
        Ok(documents)
    }
}
