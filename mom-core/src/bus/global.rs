//! Process-wide default queue and convenience functions
//!
//! Applications that can thread a [`SharedQueue`] through their startup path
//! should do so; these helpers exist for callers that just want one bus.

use super::handler::{Handler, HandlerResult};
use super::message::{Message, Payload};
use super::shared::SharedQueue;
use once_cell::sync::Lazy;
use std::sync::Arc;

static DEFAULT_QUEUE: Lazy<SharedQueue> = Lazy::new(SharedQueue::new);

/// The process-wide default queue
pub fn default_queue() -> &'static SharedQueue {
    &DEFAULT_QUEUE
}

/// Publish a message on the default queue
///
/// Returns the message that was dispatched.
pub fn publish_message(topic: impl Into<String>, payload: Payload) -> crate::Result<Arc<Message>> {
    DEFAULT_QUEUE.publish_message(topic, payload)
}

/// Subscribe a handler on the default queue
///
/// Returns the default queue so callers can keep working with it.
pub fn subscribe_to_topic(
    topic: impl Into<String>,
    handler: Arc<dyn Handler>,
) -> &'static SharedQueue {
    DEFAULT_QUEUE.subscribe_to_topic(topic, handler)
}

/// Subscribe a closure on the default queue
pub fn subscribe_fn_to_topic<F>(topic: impl Into<String>, f: F) -> &'static SharedQueue
where
    F: Fn(&Arc<Message>) -> HandlerResult + Send + Sync + 'static,
{
    DEFAULT_QUEUE.subscribe_fn(topic, f);
    &DEFAULT_QUEUE
}
