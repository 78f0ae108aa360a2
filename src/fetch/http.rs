//! HTTP page fetcher
//!
//! Decodes the common JSON collection envelope:
//!
//! ```json
//! {
//!   "data": [ ... ],
//!   "links": { "self": "https://...", "next": "https://..." },
//!   "meta": { "count": 1234 }
//! }
//! ```

use super::types::{Links, Page, PageFetcher};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::types::JsonObject;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Wire form of a collection page
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct Envelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
    #[serde(default)]
    links: Links,
    #[serde(default)]
    meta: Option<JsonObject>,
}

/// Page fetcher backed by [`HttpClient`]
pub struct HttpPageFetcher<T> {
    client: Arc<HttpClient>,
    _item: PhantomData<fn() -> T>,
}

impl<T> HttpPageFetcher<T> {
    /// Create a fetcher over a shared HTTP client
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self {
            client,
            _item: PhantomData,
        }
    }
}

#[async_trait]
impl<T> PageFetcher<T> for HttpPageFetcher<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch(&self, url: &str) -> Result<Page<T>> {
        let envelope: Envelope<T> = self
            .client
            .get_json(url)
            .await
            .map_err(|e| Error::fetch(url, e))?;
        debug!(
            "Fetched {} items from {} (next: {:?})",
            envelope.data.len(),
            url,
            envelope.links.next
        );

        Ok(Page {
            items: envelope.data,
            links: envelope.links,
            meta: envelope.meta.unwrap_or_default(),
        })
    }
}

impl<T> std::fmt::Debug for HttpPageFetcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPageFetcher")
            .field("client", &self.client)
            .finish()
    }
}
