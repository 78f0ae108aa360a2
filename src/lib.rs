// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # pagewalk
//!
//! Resumable, backpressure-aware iteration over paged HTTP collections.
//!
//! A background producer follows `links.next` from page to page and hands
//! items to the consumer through a bounded channel, so fetching stays at
//! most one channel's worth ahead of consumption. Every item carries an
//! opaque cursor; feeding that cursor back into a new iterator resumes
//! right after the item.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagewalk::{CollectionIterator, IteratorOptions};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> pagewalk::Result<()> {
//!     let client = Arc::new(pagewalk::http::HttpClient::new()?);
//!     let url = url::Url::parse("https://api.example.com/v3/files")?;
//!
//!     let mut it = CollectionIterator::<serde_json::Value>::from_client(
//!         client,
//!         url,
//!         IteratorOptions::new().with_limit(100),
//!     )?;
//!
//!     while it.advance().await {
//!         println!("{}", it.current().unwrap());
//!     }
//!     if let Some(err) = it.take_error() {
//!         eprintln!("stopped early: {err}; resume from {}", it.cursor());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐   Meta / Item / Error   ┌──────────────────────┐
//! │  Producer (spawned)  │ ──────────────────────> │  CollectionIterator  │
//! │  PageFetcher::fetch  │   bounded mpsc channel  │  advance / current   │
//! │  follows links.next  │ <────────────────────── │  cursor / close      │
//! └──────────────────────┘      CancelSignal       └──────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Opaque resume cursors
pub mod cursor;

/// Page fetching boundary
pub mod fetch;

/// HTTP client with retry and rate limiting
pub mod http;

/// Bounded delivery channel and cancellation
pub mod channel;

/// Collection iterator facade and producer
pub mod iterator;

/// Client settings files
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::ClientSettings;
pub use cursor::Position;
pub use error::{Error, Result};
pub use fetch::{HttpPageFetcher, Links, Page, PageFetcher};
pub use iterator::{CollectionIterator, IteratorOptions, StopReason};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
