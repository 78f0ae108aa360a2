//! Page fetcher types and traits

use crate::error::Result;
use crate::types::JsonObject;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

/// Pagination links returned alongside a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    /// URL of the page that was fetched
    #[serde(rename = "self", default, deserialize_with = "null_as_empty")]
    pub self_link: String,
    /// URL of the following page, empty when the collection is exhausted
    #[serde(default, deserialize_with = "null_as_empty")]
    pub next: String,
}

/// Backends send `null` for a missing next page as often as they omit it
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Links {
    /// Create links for a page
    pub fn new(self_link: impl Into<String>, next: impl Into<String>) -> Self {
        Self {
            self_link: self_link.into(),
            next: next.into(),
        }
    }

    /// Check if there is no following page
    pub fn is_last(&self) -> bool {
        self.next.is_empty()
    }
}

/// One page of a collection
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items in backend order
    pub items: Vec<T>,
    /// Pagination links
    pub links: Links,
    /// Out-of-band metadata (counts, etc.), forwarded verbatim
    pub meta: JsonObject,
}

impl<T> Page<T> {
    /// Create a page without metadata
    pub fn new(items: Vec<T>, links: Links) -> Self {
        Self {
            items,
            links,
            meta: JsonObject::new(),
        }
    }

    /// Attach metadata
    #[must_use]
    pub fn with_meta(mut self, meta: JsonObject) -> Self {
        self.meta = meta;
        self
    }

    /// Number of items on the page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Fetches a single page of a collection
///
/// Implementations must not retry at the iterator's request; any failure is
/// returned as-is and ends the traversal.
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    /// Fetch the page at `url`
    async fn fetch(&self, url: &str) -> Result<Page<T>>;
}
