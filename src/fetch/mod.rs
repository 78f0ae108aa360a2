//! Page fetcher module
//!
//! The boundary between the iterator core and the backend. A fetcher takes a
//! page URL and returns the items on that page, the pagination links and any
//! out-of-band metadata.
//!
//! # Overview
//!
//! - `PageFetcher` - async trait implemented by every backend
//! - `Page` / `Links` - one decoded page
//! - `HttpPageFetcher` - fetcher for JSON APIs using the `data`/`links`/`meta` envelope

mod http;
mod types;

pub use http::HttpPageFetcher;
pub use types::{Links, Page, PageFetcher};
