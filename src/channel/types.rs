//! Messages carried by the delivery channel

use crate::cursor::Position;
use crate::error::Error;
use crate::types::JsonObject;

/// A domain object paired with the position immediately after it
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedItem<T> {
    /// The object as returned by the backend
    pub object: T,
    /// Where to resume after this object
    pub position: Position,
}

impl<T> TaggedItem<T> {
    /// Tag an object with its resumption position
    pub fn new(object: T, position: Position) -> Self {
        Self { object, position }
    }
}

/// A message sent from the producer to the consumer
#[derive(Debug)]
pub enum Message<T> {
    /// Metadata of a freshly fetched page, sent before its items
    Meta(JsonObject),
    /// An item ready for the consumer
    Item(TaggedItem<T>),
    /// Terminal failure; nothing follows it
    Error(Error),
}

impl<T> Message<T> {
    /// Check if this is an item message
    pub fn is_item(&self) -> bool {
        matches!(self, Self::Item(_))
    }

    /// Check if this is a terminal error
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Outcome of a delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The message was enqueued
    Delivered,
    /// Cancellation was requested (or the consumer is gone); the message was
    /// dropped and the producer must stop
    Cancelled,
}

impl Delivery {
    /// Check if the message was enqueued
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Check if the producer must stop
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
