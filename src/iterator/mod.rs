//! Collection iterator module
//!
//! Pull-based iteration over a paged collection with a background producer.
//!
//! # Overview
//!
//! Constructing a [`CollectionIterator`] resolves the starting position
//! (fresh query or decoded cursor), spawns the producer task and returns
//! immediately. The producer fetches pages one at a time, tags every item
//! with the position right after it and pushes it into the bounded delivery
//! channel. The consumer pulls with [`CollectionIterator::advance`].
//!
//! ```rust,ignore
//! use pagewalk::iterator::{CollectionIterator, IteratorOptions};
//!
//! let options = IteratorOptions::new().with_filter("type:pdf").with_limit(100);
//! let mut it = CollectionIterator::new(fetcher, url, options)?;
//! while it.advance().await {
//!     let object = it.current().unwrap();
//!     // ...
//! }
//! if let Some(err) = it.error() {
//!     // resume later from it.cursor()
//! }
//! ```

mod collection;
mod options;
mod producer;

pub use collection::CollectionIterator;
pub use options::IteratorOptions;
pub use producer::StopReason;

#[cfg(test)]
mod tests;
