//! Iterator construction options

use crate::channel::DEFAULT_CAPACITY;
use crate::cursor::Position;
use crate::error::Result;
use url::Url;

/// Options recognized when constructing an iterator
///
/// `filter`, `batch_size` and `descriptors_only` shape the initial request
/// and only apply to a fresh start; a cursor carries its own link.
#[derive(Debug, Clone)]
pub struct IteratorOptions {
    /// Resume from this cursor token (empty = fresh start)
    pub cursor: String,
    /// Query predicate forwarded to the backend
    pub filter: String,
    /// Page size hint forwarded to the backend (0 = backend default)
    pub batch_size: usize,
    /// Maximum items over the iterator's lifetime (0 = unbounded)
    pub limit: usize,
    /// Ask the backend for object descriptors instead of full objects
    pub descriptors_only: bool,
    /// Delivery channel capacity
    pub channel_capacity: usize,
}

impl Default for IteratorOptions {
    fn default() -> Self {
        Self {
            cursor: String::new(),
            filter: String::new(),
            batch_size: 0,
            limit: 0,
            descriptors_only: false,
            channel_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl IteratorOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a cursor token
    #[must_use]
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = cursor.into();
        self
    }

    /// Set the backend filter
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Set the page size hint
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the item limit
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Request descriptors only
    #[must_use]
    pub fn with_descriptors_only(mut self, descriptors_only: bool) -> Self {
        self.descriptors_only = descriptors_only;
        self
    }

    /// Set the delivery channel capacity
    #[must_use]
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Resolve where traversal starts
    ///
    /// With a cursor, this is the decoded position. Otherwise it is the first
    /// page of `url` with the request options appended to its query.
    pub fn start_position(&self, mut url: Url) -> Result<Position> {
        if !self.cursor.is_empty() {
            return Position::decode(&self.cursor);
        }

        {
            let mut query = url.query_pairs_mut();
            if self.batch_size > 0 {
                query.append_pair("limit", &self.batch_size.to_string());
            }
            if !self.filter.is_empty() {
                query.append_pair("filter", &self.filter);
            }
            if self.descriptors_only {
                query.append_pair("descriptors_only", "true");
            }
        }
        // An untouched query serializer can leave a dangling '?'
        if url.query() == Some("") {
            url.set_query(None);
        }

        Ok(Position::page_start(url))
    }
}
