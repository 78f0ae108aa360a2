//! Delivery channel module
//!
//! The handoff between the producer task and the consumer.
//!
//! # Overview
//!
//! - `delivery_channel` - bounded queue of [`Message`]s; its capacity is the
//!   only backpressure in the system
//! - `CancelSignal` - one-shot, idempotent stop request observed by the
//!   producer on every delivery attempt
//! - `Delivery` - outcome of a delivery attempt

mod cancel;
mod delivery;
mod types;

pub use cancel::CancelSignal;
pub use delivery::{delivery_channel, DeliveryReceiver, DeliverySender, DEFAULT_CAPACITY};
pub use types::{Delivery, Message, TaggedItem};
