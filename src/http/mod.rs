//! HTTP client module
//!
//! Transport behind the HTTP page fetcher.
//!
//! # Features
//!
//! - **Automatic Retries**: bounded retries with backoff for transient failures
//! - **Rate Limiting**: token bucket rate limiter using governor
//! - **Default Headers**: API keys and other per-client headers

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
