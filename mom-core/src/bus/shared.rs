//! Thread-safe handle over a message queue

use super::dispatch::DispatchReport;
use super::handler::{Handler, HandlerResult};
use super::message::{Message, Payload};
use super::queue::{dispatch, dispatch_collect, MessageQueue};
use crate::config::{BusConfig, DispatchMode};
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable handle to a [`MessageQueue`] shared between callers
///
/// The lock is only held while the registry or history is touched. Handlers
/// run after it is released, so they may publish or subscribe on the same
/// queue. Handlers subscribed during a dispatch are not invoked by it.
#[derive(Clone, Debug, Default)]
pub struct SharedQueue {
    inner: Arc<Mutex<MessageQueue>>,
}

impl SharedQueue {
    /// Create a new shared queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shared queue with explicit bus settings
    pub fn with_config(config: BusConfig) -> Self {
        Self::from_queue(MessageQueue::with_config(config))
    }

    /// Wrap an existing queue
    pub fn from_queue(queue: MessageQueue) -> Self {
        Self {
            inner: Arc::new(Mutex::new(queue)),
        }
    }

    /// Subscribe a handler to a topic
    pub fn subscribe(&self, topic: impl Into<String>, handler: Arc<dyn Handler>) {
        self.inner.lock().subscribe(topic, handler);
    }

    /// Subscribe a closure to a topic
    pub fn subscribe_fn<F>(&self, topic: impl Into<String>, f: F)
    where
        F: Fn(&Arc<Message>) -> HandlerResult + Send + Sync + 'static,
    {
        self.inner.lock().subscribe_fn(topic, f);
    }

    /// Subscribe a handler and return this queue for chaining
    pub fn subscribe_to_topic(&self, topic: impl Into<String>, handler: Arc<dyn Handler>) -> &Self {
        self.subscribe(topic, handler);
        self
    }

    /// Publish a message, stopping at the first handler failure
    pub fn publish(&self, message: Message) -> crate::Result<Arc<Message>> {
        let (message, handlers) = self.prepare(message);
        dispatch(&message, &handlers)?;
        Ok(message)
    }

    /// Publish a message, invoking every handler regardless of failures
    pub fn publish_collect(&self, message: Message) -> DispatchReport {
        let (message, handlers) = self.prepare(message);
        dispatch_collect(message, &handlers)
    }

    /// Build a message from its parts and publish it
    ///
    /// Dispatch follows the queue's configured [`DispatchMode`]. In
    /// `Collect` mode handler failures are logged and never returned.
    pub fn publish_message(
        &self,
        topic: impl Into<String>,
        payload: Payload,
    ) -> crate::Result<Arc<Message>> {
        let message = Message::new(topic, payload);
        match self.config().dispatch {
            DispatchMode::FailFast => self.publish(message),
            DispatchMode::Collect => Ok(self.publish_collect(message).message),
        }
    }

    /// Get messages for a topic, or the whole history
    pub fn get_messages(&self, topic: Option<&str>) -> Vec<Arc<Message>> {
        self.inner.lock().get_messages(topic)
    }

    /// Number of handlers registered for a topic
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.inner.lock().subscriber_count(topic)
    }

    /// Number of messages in history
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if nothing has been published yet
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Bus settings in effect
    pub fn config(&self) -> BusConfig {
        self.inner.lock().config().clone()
    }

    /// Run a closure with exclusive access to the underlying queue
    ///
    /// Do not publish through the same handle from inside the closure.
    pub fn with_queue<R>(&self, f: impl FnOnce(&mut MessageQueue) -> R) -> R {
        f(&mut self.inner.lock())
    }

    fn prepare(&self, message: Message) -> (Arc<Message>, Vec<Arc<dyn Handler>>) {
        let mut queue = self.inner.lock();
        let message = queue.record(message);
        let handlers = queue.handlers(&message.topic).to_vec();
        (message, handlers)
    }
}
