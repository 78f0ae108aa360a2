//! Tests for the collection iterator

use super::*;
use crate::cursor::Position;
use crate::error::{Error, Result};
use crate::fetch::{Links, Page, PageFetcher};
use crate::types::JsonObject;
use async_trait::async_trait;
use futures::StreamExt;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const FIRST: &str = "https://api.test/items";
const SECOND: &str = "https://api.test/items?cursor=p2";

// ============================================================================
// In-memory backend
// ============================================================================

enum Entry {
    Page(Page<String>),
    Fail,
}

#[derive(Default)]
struct MemoryBackend {
    pages: HashMap<String, Entry>,
    calls: AtomicUsize,
}

impl MemoryBackend {
    fn page(mut self, url: &str, items: &[&str], next: &str) -> Self {
        let mut meta = JsonObject::new();
        meta.insert("page".to_string(), url.into());
        let page = Page::new(
            items.iter().map(|s| (*s).to_string()).collect(),
            Links::new(url, next),
        )
        .with_meta(meta);
        self.pages.insert(url.to_string(), Entry::Page(page));
        self
    }

    fn failing(mut self, url: &str) -> Self {
        self.pages.insert(url.to_string(), Entry::Fail);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher<String> for MemoryBackend {
    async fn fetch(&self, url: &str) -> Result<Page<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.pages.get(url) {
            Some(Entry::Page(page)) => Ok(page.clone()),
            Some(Entry::Fail) => Err(Error::http_status(503, "unavailable")),
            None => Err(Error::fetch(url, Error::Other("no such page".to_string()))),
        }
    }
}

fn two_pages() -> Arc<MemoryBackend> {
    Arc::new(
        MemoryBackend::default()
            .page(FIRST, &["a", "b"], SECOND)
            .page(SECOND, &["c", "d"], ""),
    )
}

fn start(backend: &Arc<MemoryBackend>, options: IteratorOptions) -> CollectionIterator<String> {
    let fetcher: Arc<dyn PageFetcher<String>> = backend.clone();
    CollectionIterator::new(fetcher, Url::parse(FIRST).unwrap(), options).unwrap()
}

async fn drain(it: &mut CollectionIterator<String>) -> Vec<String> {
    let mut seen = Vec::new();
    while it.advance().await {
        seen.push(it.current().unwrap().clone());
    }
    seen
}

// ============================================================================
// Traversal Tests
// ============================================================================

#[tokio::test]
async fn test_yields_items_in_backend_order() {
    let backend = two_pages();
    let mut it = start(&backend, IteratorOptions::new());

    assert_eq!(drain(&mut it).await, vec!["a", "b", "c", "d"]);
    assert!(it.error().is_none());
    assert_eq!(it.count(), 4);
    assert!(it.current().is_none());
    // Past the last item there is nothing to resume
    assert_eq!(it.cursor(), "");

    // Terminal: keeps returning false
    assert!(!it.advance().await);
    assert!(!it.advance().await);
}

#[tokio::test]
async fn test_cursor_positions_are_tagged_per_page() {
    let backend = two_pages();
    let mut it = start(&backend, IteratorOptions::new());

    assert!(it.advance().await);
    assert_eq!(
        Position::decode(it.cursor()).unwrap(),
        Position::new(FIRST, 1)
    );

    assert!(it.advance().await);
    assert_eq!(
        Position::decode(it.cursor()).unwrap(),
        Position::page_start(SECOND)
    );

    assert!(it.advance().await);
    assert_eq!(
        Position::decode(it.cursor()).unwrap(),
        Position::new(SECOND, 1)
    );
}

#[tokio::test]
async fn test_empty_collection() {
    let backend = Arc::new(MemoryBackend::default().page(FIRST, &[], ""));
    let mut it = start(&backend, IteratorOptions::new());

    assert!(!it.advance().await);
    assert!(it.error().is_none());
    assert!(it.current().is_none());
    assert_eq!(it.meta().get("page").unwrap(), FIRST);
}

#[tokio::test]
async fn test_empty_page_stops_even_with_next_link() {
    let backend = Arc::new(
        MemoryBackend::default()
            .page(FIRST, &[], SECOND)
            .page(SECOND, &["never"], ""),
    );
    let mut it = start(&backend, IteratorOptions::new());

    assert!(!it.advance().await);
    assert_eq!(it.shutdown().await, Some(StopReason::EmptyPage));
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn test_meta_follows_current_page() {
    let backend = two_pages();
    let mut it = start(&backend, IteratorOptions::new());

    assert!(it.meta().is_empty());
    assert!(it.advance().await);
    assert_eq!(it.meta().get("page").unwrap(), FIRST);

    // The producer runs ahead; meta stays with the page being read
    while backend.calls() < 2 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(it.meta().get("page").unwrap(), FIRST);
    assert!(it.advance().await);
    assert_eq!(it.meta().get("page").unwrap(), FIRST);
    assert!(it.advance().await);
    assert!(it.advance().await);
    assert_eq!(it.meta().get("page").unwrap(), SECOND);
}

// ============================================================================
// Resumption Tests
// ============================================================================

#[tokio::test]
async fn test_resume_at_page_boundary() {
    let backend = two_pages();
    let mut it = start(&backend, IteratorOptions::new());

    assert!(it.advance().await);
    assert!(it.advance().await);
    let token = it.cursor().to_string();
    it.close();

    let mut resumed = start(&backend, IteratorOptions::new().with_cursor(token));
    assert_eq!(drain(&mut resumed).await, vec!["c", "d"]);
    assert!(resumed.error().is_none());
}

#[tokio::test]
async fn test_resume_mid_page() {
    let backend = two_pages();
    let mut it = start(&backend, IteratorOptions::new());

    assert!(it.advance().await);
    assert_eq!(it.current().map(String::as_str), Some("a"));
    let token = it.cursor().to_string();
    drop(it);

    let mut resumed = start(&backend, IteratorOptions::new().with_cursor(token));
    assert_eq!(drain(&mut resumed).await, vec!["b", "c", "d"]);
}

#[tokio::test]
async fn test_resume_offset_past_page_end_moves_on() {
    let backend = two_pages();
    let token = Position::new(FIRST, 10).encode();

    let mut it = start(&backend, IteratorOptions::new().with_cursor(token));
    assert_eq!(drain(&mut it).await, vec!["c", "d"]);
}

#[tokio::test]
async fn test_cursor_before_first_advance_is_initial_cursor() {
    let backend = two_pages();
    let token = Position::page_start(SECOND).encode();

    let it = start(&backend, IteratorOptions::new().with_cursor(token.clone()));
    assert_eq!(it.cursor(), token);

    let fresh = start(&backend, IteratorOptions::new());
    assert_eq!(fresh.cursor(), "");
}

#[tokio::test]
async fn test_invalid_cursor_fails_construction() {
    let backend = two_pages();
    let fetcher: Arc<dyn PageFetcher<String>> = backend.clone();

    let result = CollectionIterator::new(
        fetcher,
        Url::parse(FIRST).unwrap(),
        IteratorOptions::new().with_cursor("%%% not a cursor"),
    );

    assert!(matches!(result, Err(Error::CursorDecode { .. })));
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(backend.calls(), 0);
}

// ============================================================================
// Limit Tests
// ============================================================================

#[tokio::test]
async fn test_limit_stops_delivery() {
    let backend = two_pages();
    let mut it = start(&backend, IteratorOptions::new().with_limit(2));

    assert_eq!(drain(&mut it).await, vec!["a", "b"]);
    assert!(it.error().is_none());
    assert!(!it.advance().await);
    assert_eq!(it.shutdown().await, Some(StopReason::LimitReached));
    // The limit fell on a page boundary: page 2 is never requested
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn test_limit_mid_page() {
    let backend = two_pages();
    let mut it = start(&backend, IteratorOptions::new().with_limit(3));

    assert_eq!(drain(&mut it).await, vec!["a", "b", "c"]);
    assert_eq!(
        Position::decode(it.cursor()).unwrap(),
        Position::new(SECOND, 1)
    );
}

// ============================================================================
// Error Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_error_on_second_page() {
    let backend = Arc::new(
        MemoryBackend::default()
            .page(FIRST, &["a", "b"], SECOND)
            .failing(SECOND),
    );
    let mut it = start(&backend, IteratorOptions::new());

    assert_eq!(drain(&mut it).await, vec!["a", "b"]);
    assert!(matches!(
        it.error(),
        Some(Error::HttpStatus { status: 503, .. })
    ));
    // The last good cursor still points at the failed page
    assert_eq!(
        Position::decode(it.cursor()).unwrap(),
        Position::page_start(SECOND)
    );
    assert!(!it.advance().await);
}

#[tokio::test]
async fn test_fetch_error_on_first_page() {
    let backend = Arc::new(MemoryBackend::default().failing(FIRST));
    let mut it = start(&backend, IteratorOptions::new());

    assert!(!it.advance().await);
    assert!(it.error().is_some());
    assert_eq!(it.shutdown().await, Some(StopReason::FetchFailed));
}

// ============================================================================
// Backpressure & Cancellation Tests
// ============================================================================

fn long_collection(pages: usize) -> Arc<MemoryBackend> {
    let url_of = |n: usize| {
        if n == 0 {
            FIRST.to_string()
        } else {
            format!("{FIRST}?page={n}")
        }
    };

    let mut backend = MemoryBackend::default();
    for n in 0..pages {
        let next = if n + 1 < pages {
            url_of(n + 1)
        } else {
            String::new()
        };
        backend = backend.page(&url_of(n), &["x", "y"], &next);
    }
    Arc::new(backend)
}

#[tokio::test]
async fn test_idle_consumer_bounds_fetching() {
    let backend = long_collection(20);
    let capacity = 4;
    let it = start(
        &backend,
        IteratorOptions::new().with_channel_capacity(capacity),
    );

    tokio::time::sleep(Duration::from_millis(100)).await;

    // Two items per page: the queue fills after a couple of pages plus the
    // one fetch whose result is waiting for a slot.
    let calls = backend.calls();
    assert!(calls >= 1);
    assert!(calls <= capacity / 2 + 1, "fetched {calls} pages");
    assert!(!it.is_producer_finished());

    assert_eq!(it.shutdown().await, Some(StopReason::Cancelled));
    assert_eq!(backend.calls(), calls);
}

#[tokio::test]
async fn test_slow_consumer_still_sees_everything() {
    let backend = long_collection(10);
    let mut it = start(&backend, IteratorOptions::new().with_channel_capacity(1));

    let mut seen = 0;
    while it.advance().await {
        seen += 1;
        if seen % 5 == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
    assert_eq!(seen, 20);
    assert!(it.error().is_none());
}

#[tokio::test]
async fn test_close_is_idempotent() {
    let backend = two_pages();
    let mut it = start(&backend, IteratorOptions::new());

    assert!(it.advance().await);
    it.close();
    it.close();
    assert!(!it.advance().await);
    assert!(it.error().is_none());
    // Current object survives close
    assert_eq!(it.current().map(String::as_str), Some("a"));
}

#[tokio::test]
async fn test_close_after_exhaustion() {
    let backend = two_pages();
    let mut it = start(&backend, IteratorOptions::new());

    assert_eq!(drain(&mut it).await.len(), 4);
    it.close();
    it.close();
    assert_eq!(it.shutdown().await, Some(StopReason::Exhausted));
}

#[tokio::test]
async fn test_close_before_first_advance() {
    let backend = two_pages();
    let mut it = start(&backend, IteratorOptions::new());

    it.close();
    assert!(!it.advance().await);
    assert!(it.error().is_none());
    assert!(it.shutdown().await.is_some());
}

// ============================================================================
// Stream Tests
// ============================================================================

#[tokio::test]
async fn test_into_stream() {
    let backend = two_pages();
    let items: Vec<String> = start(&backend, IteratorOptions::new())
        .into_stream()
        .map(|r| r.unwrap())
        .collect()
        .await;

    assert_eq!(items, vec!["a", "b", "c", "d"]);
}

#[tokio::test]
async fn test_into_stream_ends_with_error() {
    let backend = Arc::new(
        MemoryBackend::default()
            .page(FIRST, &["a"], SECOND)
            .failing(SECOND),
    );
    let results: Vec<Result<String>> = start(&backend, IteratorOptions::new())
        .into_stream()
        .collect()
        .await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_ref().unwrap(), "a");
    assert!(results[1].is_err());
}

// ============================================================================
// Options Tests
// ============================================================================

#[test]
fn test_options_default() {
    let options = IteratorOptions::default();
    assert!(options.cursor.is_empty());
    assert_eq!(options.limit, 0);
    assert_eq!(options.batch_size, 0);
    assert!(!options.descriptors_only);
    assert_eq!(options.channel_capacity, crate::channel::DEFAULT_CAPACITY);
}

#[test]
fn test_fresh_start_appends_query() {
    let options = IteratorOptions::new()
        .with_batch_size(40)
        .with_filter("type:pdf")
        .with_descriptors_only(true);
    let url = Url::parse("https://api.test/search?query=foo").unwrap();

    let position = options.start_position(url).unwrap();
    assert_eq!(
        position.link,
        "https://api.test/search?query=foo&limit=40&filter=type%3Apdf&descriptors_only=true"
    );
    assert_eq!(position.offset, 0);
}

#[test]
fn test_fresh_start_without_options_keeps_url() {
    let url = Url::parse(FIRST).unwrap();
    let position = IteratorOptions::new().start_position(url).unwrap();
    assert_eq!(position.link, FIRST);
}

#[test]
fn test_cursor_ignores_request_options() {
    let token = Position::new(SECOND, 1).encode();
    let options = IteratorOptions::new()
        .with_cursor(token)
        .with_filter("ignored")
        .with_batch_size(10);

    let position = options.start_position(Url::parse(FIRST).unwrap()).unwrap();
    assert_eq!(position, Position::new(SECOND, 1));
}
