//! Bounded delivery channel

use super::cancel::CancelSignal;
use super::types::{Delivery, Message};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Default number of queued messages before the producer waits
pub const DEFAULT_CAPACITY: usize = 50;

/// Create a bounded delivery channel tied to a cancellation signal
///
/// A capacity of zero is raised to one.
pub fn delivery_channel<T>(
    capacity: usize,
    cancel: Arc<CancelSignal>,
) -> (DeliverySender<T>, DeliveryReceiver<T>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (DeliverySender { tx, cancel }, DeliveryReceiver { rx })
}

/// Producer half of the delivery channel
#[derive(Debug)]
pub struct DeliverySender<T> {
    tx: mpsc::Sender<Message<T>>,
    cancel: Arc<CancelSignal>,
}

impl<T> DeliverySender<T> {
    /// Enqueue a message, waiting for a free slot
    ///
    /// While the queue is full the wait also watches the cancellation signal,
    /// so a stop request is seen promptly even when the consumer is not
    /// reading. A signal that has already fired wins over a free slot.
    pub async fn deliver(&self, message: Message<T>) -> Delivery {
        tokio::select! {
            biased;

            () = self.cancel.cancelled() => Delivery::Cancelled,
            permit = self.tx.reserve() => match permit {
                Ok(permit) => {
                    permit.send(message);
                    Delivery::Delivered
                }
                // Receiver dropped: nobody is listening any more
                Err(_) => Delivery::Cancelled,
            },
        }
    }

    /// Check if cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Close the channel and retire the cancellation signal
    ///
    /// Consumes the sender so it happens exactly once. A consumer waiting in
    /// `recv` wakes up once the queued messages are drained.
    pub fn shutdown(self) {
        self.cancel.retire();
        drop(self.tx);
    }
}

/// Consumer half of the delivery channel
#[derive(Debug)]
pub struct DeliveryReceiver<T> {
    rx: mpsc::Receiver<Message<T>>,
}

impl<T> DeliveryReceiver<T> {
    /// Wait for the next message; `None` once the producer shut down and the
    /// queue is empty
    pub async fn recv(&mut self) -> Option<Message<T>> {
        self.rx.recv().await
    }

    /// Number of messages currently queued
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Check if no messages are queued
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
