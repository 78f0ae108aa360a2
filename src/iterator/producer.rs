//! Producer loop
//!
//! The only writer of the delivery channel. Runs as one tokio task per
//! iterator and shuts the channel down exactly once, whatever the reason it
//! stops.

use crate::channel::{Delivery, DeliverySender, Message, TaggedItem};
use crate::cursor::Position;
use crate::fetch::{Links, Page, PageFetcher};
use std::sync::Arc;
use tracing::{debug, warn};

/// Why the producer stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The item limit was delivered
    LimitReached,
    /// A fetched page had no items
    EmptyPage,
    /// The last page had no next link
    Exhausted,
    /// A fetch failed; the error was delivered to the consumer
    FetchFailed,
    /// Cancellation was requested or the consumer went away
    Cancelled,
}

pub(crate) struct Producer<T> {
    fetcher: Arc<dyn PageFetcher<T>>,
    sender: DeliverySender<T>,
    next_link: String,
    skip: usize,
    limit: usize,
    sent: usize,
}

impl<T: Send + 'static> Producer<T> {
    pub(crate) fn new(
        fetcher: Arc<dyn PageFetcher<T>>,
        sender: DeliverySender<T>,
        start: Position,
        limit: usize,
    ) -> Self {
        Self {
            fetcher,
            sender,
            next_link: start.link,
            skip: start.offset,
            limit,
            sent: 0,
        }
    }

    /// Run until done, then close the channel
    pub(crate) async fn run(mut self) -> StopReason {
        let reason = self.pump().await;
        debug!("Producer stopped ({:?}) after {} items", reason, self.sent);
        self.sender.shutdown();
        reason
    }

    fn limit_reached(&self) -> bool {
        self.limit > 0 && self.sent >= self.limit
    }

    async fn pump(&mut self) -> StopReason {
        if self.next_link.is_empty() {
            return StopReason::Exhausted;
        }

        loop {
            if self.limit_reached() {
                return StopReason::LimitReached;
            }
            if self.sender.is_cancelled() {
                return StopReason::Cancelled;
            }

            let url = std::mem::take(&mut self.next_link);
            let page = match self.fetcher.fetch(&url).await {
                Ok(page) => page,
                Err(error) => {
                    warn!("Fetching {} failed: {}", url, error.root());
                    return match self.sender.deliver(Message::Error(error)).await {
                        Delivery::Delivered => StopReason::FetchFailed,
                        Delivery::Cancelled => StopReason::Cancelled,
                    };
                }
            };

            let Page { items, links, meta } = page;
            debug!("Page {}: {} items, next {:?}", url, items.len(), links.next);
            let Links { self_link, next } = links;

            if self.sender.deliver(Message::Meta(meta)).await.is_cancelled() {
                return StopReason::Cancelled;
            }

            if items.is_empty() {
                return StopReason::EmptyPage;
            }

            // Only the first page after a cursor is resumed mid-way
            let skip = std::mem::take(&mut self.skip);
            let last = items.len() - 1;
            let self_link = if self_link.is_empty() { url } else { self_link };

            for (index, object) in items.into_iter().enumerate().skip(skip) {
                // Mid-page items resume on this page; the last one resumes on
                // the next page so the cursor never points past the end.
                let position = if index == last {
                    Position::page_start(next.clone())
                } else {
                    Position::new(self_link.clone(), index + 1)
                };

                let message = Message::Item(TaggedItem::new(object, position));
                if self.sender.deliver(message).await.is_cancelled() {
                    return StopReason::Cancelled;
                }

                self.sent += 1;
                if self.limit_reached() {
                    return StopReason::LimitReached;
                }
            }

            if next.is_empty() {
                return StopReason::Exhausted;
            }
            self.next_link = next;
        }
    }
}
