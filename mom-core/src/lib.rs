//! In-process publish/subscribe message bus
//!
//! This crate provides the message bus itself along with the
//! configuration, logging and error types it is used with.
//!
//! ```
//! use mom_core::bus::{Message, MessageQueue, Payload};
//!
//! let mut queue = MessageQueue::new();
//! queue.subscribe_fn("greetings", |msg| {
//!     println!("received {}", msg);
//!     Ok(())
//! });
//! queue.publish(Message::new("greetings", Payload::new())).unwrap();
//! assert_eq!(queue.get_messages(Some("greetings")).len(), 1);
//! ```

pub mod bus;
pub mod config;
pub mod error;
pub mod logging;

pub use bus::{
    publish_message, subscribe_to_topic, Handler, HandlerError, Message, MessageQueue, Payload,
    SharedQueue,
};
pub use error::{Error, Result};
