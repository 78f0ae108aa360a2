//! Consumer-facing iterator

use super::options::IteratorOptions;
use super::producer::{Producer, StopReason};
use crate::channel::{delivery_channel, CancelSignal, DeliveryReceiver, Message};
use crate::error::{Error, Result};
use crate::fetch::{HttpPageFetcher, PageFetcher};
use crate::http::HttpClient;
use crate::types::{JsonObject, JsonValue};
use futures::Stream;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::task::JoinHandle;
use url::Url;

/// Iterator over a paged collection
///
/// Every field is owned by the consumer side. The producer task talks to it
/// only through the delivery channel, errors included.
pub struct CollectionIterator<T = JsonValue> {
    receiver: DeliveryReceiver<T>,
    cancel: Arc<CancelSignal>,
    producer: JoinHandle<StopReason>,
    current: Option<T>,
    error: Option<Error>,
    cursor: String,
    meta: JsonObject,
    count: usize,
    limit: usize,
    done: bool,
}

impl<T: Send + 'static> CollectionIterator<T> {
    /// Start iterating over the collection at `url`
    ///
    /// Returns as soon as the producer task is spawned, so it must be called
    /// from within a tokio runtime. Fails only if the cursor in `options`
    /// cannot be decoded.
    pub fn new(
        fetcher: Arc<dyn PageFetcher<T>>,
        url: Url,
        options: IteratorOptions,
    ) -> Result<Self> {
        let start = options.start_position(url)?;

        let cancel = Arc::new(CancelSignal::new());
        let (sender, receiver) = delivery_channel(options.channel_capacity, Arc::clone(&cancel));
        let producer = Producer::new(fetcher, sender, start, options.limit);

        Ok(Self {
            receiver,
            cancel,
            producer: tokio::spawn(producer.run()),
            current: None,
            error: None,
            cursor: options.cursor,
            meta: JsonObject::new(),
            count: 0,
            limit: options.limit,
            done: false,
        })
    }

    /// Advance to the next object
    ///
    /// Returns `false` at the end of the collection, when the limit is
    /// reached, after a fetch error (see [`error`](Self::error)) or after
    /// [`close`](Self::close). Once `false`, it stays `false`.
    pub async fn advance(&mut self) -> bool {
        if self.done {
            return false;
        }
        if self.limit > 0 && self.count >= self.limit {
            self.finish();
            return false;
        }

        loop {
            match self.receiver.recv().await {
                Some(Message::Meta(meta)) => self.meta = meta,
                Some(Message::Item(tagged)) => {
                    self.current = Some(tagged.object);
                    self.cursor = tagged.position.encode();
                    self.count += 1;
                    return true;
                }
                Some(Message::Error(error)) => {
                    self.error = Some(error);
                    self.finish();
                    return false;
                }
                None => {
                    self.finish();
                    return false;
                }
            }
        }
    }

    /// Object produced by the last successful [`advance`](Self::advance)
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Take ownership of the current object
    pub fn take_current(&mut self) -> Option<T> {
        self.current.take()
    }

    /// Cursor token for the position right after the current object
    ///
    /// Before the first advance this is the cursor the iterator was created
    /// with. An empty token means there is nothing to resume.
    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    /// Metadata of the page the current object came from
    ///
    /// Updated when [`advance`](Self::advance) reaches a new page, not when
    /// the producer fetches it. Past the end it belongs to the last page read.
    pub fn meta(&self) -> &JsonObject {
        &self.meta
    }

    /// Error that ended the iteration, if any
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Take ownership of the error that ended the iteration
    pub fn take_error(&mut self) -> Option<Error> {
        self.error.take()
    }

    /// Number of objects delivered so far
    pub fn count(&self) -> usize {
        self.count
    }

    /// Check if the producer task has exited
    pub fn is_producer_finished(&self) -> bool {
        self.producer.is_finished()
    }

    /// Stop the iteration
    ///
    /// Safe to call any number of times, including after the collection was
    /// exhausted. Subsequent calls to [`advance`](Self::advance) return
    /// `false`; the current object stays available.
    pub fn close(&mut self) {
        self.done = true;
        self.cancel.fire();
    }

    /// Close the iterator and wait for the producer task to exit
    ///
    /// Returns why the producer stopped; `None` if the task panicked.
    pub async fn shutdown(mut self) -> Option<StopReason> {
        self.close();
        (&mut self.producer).await.ok()
    }

    /// Convert into a stream of objects
    ///
    /// A fetch error is yielded once as the final element.
    pub fn into_stream(self) -> impl Stream<Item = Result<T>> + Send {
        futures::stream::unfold(self, |mut it| async move {
            if it.advance().await {
                it.take_current().map(|object| (Ok(object), it))
            } else {
                it.take_error().map(|error| (Err(error), it))
            }
        })
    }

    fn finish(&mut self) {
        self.done = true;
        self.current = None;
    }
}

impl<T> CollectionIterator<T>
where
    T: DeserializeOwned + Send + 'static,
{
    /// Iterate over a JSON collection served over HTTP
    pub fn from_client(
        client: Arc<HttpClient>,
        url: Url,
        options: IteratorOptions,
    ) -> Result<Self> {
        Self::new(Arc::new(HttpPageFetcher::new(client)), url, options)
    }
}

impl<T> Drop for CollectionIterator<T> {
    fn drop(&mut self) {
        self.cancel.fire();
    }
}

impl<T> std::fmt::Debug for CollectionIterator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionIterator")
            .field("cursor", &self.cursor)
            .field("count", &self.count)
            .field("limit", &self.limit)
            .field("done", &self.done)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}
