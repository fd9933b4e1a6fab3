//! Synchronous message queue implementation

use super::dispatch::{DispatchOutcome, DispatchReport};
use super::handler::{FnHandler, Handler, HandlerResult};
use super::message::Message;
use crate::config::BusConfig;
use chrono::Utc;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Topic-keyed publish/subscribe bus with an append-only history
///
/// Subscribers are invoked synchronously on the publishing thread in the
/// order they subscribed. Every published message is retained in publish
/// order, whether or not anyone was listening.
#[derive(Default)]
pub struct MessageQueue {
    /// Handlers by topic, in subscription order
    subscribers: HashMap<String, Vec<Arc<dyn Handler>>>,
    /// Every published message, in publish order
    messages: Vec<Arc<Message>>,
    config: BusConfig,
}

impl MessageQueue {
    /// Create a new message queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a message queue with explicit bus settings
    pub fn with_config(config: BusConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Bus settings in effect
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Subscribe a handler to a topic
    ///
    /// Registering the same handler twice yields two invocations per publish.
    pub fn subscribe(&mut self, topic: impl Into<String>, handler: Arc<dyn Handler>) {
        let topic = topic.into();
        let handlers = self.subscribers.entry(topic.clone()).or_default();
        handlers.push(handler);
        debug!(topic = %topic, subscribers = handlers.len(), "Subscribed handler");
    }

    /// Subscribe a closure to a topic
    pub fn subscribe_fn<F>(&mut self, topic: impl Into<String>, f: F)
    where
        F: Fn(&Arc<Message>) -> HandlerResult + Send + Sync + 'static,
    {
        let topic = topic.into();
        let handler = Arc::new(FnHandler::new(topic.clone(), f));
        self.subscribe(topic, handler);
    }

    /// Publish a message
    ///
    /// The message is recorded in history before any handler runs. Handlers
    /// are then invoked in subscription order; the first failure stops the
    /// dispatch and is returned, leaving later handlers uninvoked for this
    /// publish. The message stays in history either way.
    pub fn publish(&mut self, message: Message) -> crate::Result<Arc<Message>> {
        let message = self.record(message);
        dispatch(&message, self.handlers(&message.topic))?;
        Ok(message)
    }

    /// Publish a message, invoking every handler regardless of failures
    pub fn publish_collect(&mut self, message: Message) -> DispatchReport {
        let message = self.record(message);
        dispatch_collect(message.clone(), self.handlers(&message.topic))
    }

    /// Get messages for a topic, or the whole history
    ///
    /// `None` or an empty topic returns every message. An unknown topic
    /// returns an empty list.
    pub fn get_messages(&self, topic: Option<&str>) -> Vec<Arc<Message>> {
        match topic {
            Some(topic) if !topic.is_empty() => self
                .messages
                .iter()
                .filter(|msg| msg.topic == topic)
                .cloned()
                .collect(),
            _ => self.messages.clone(),
        }
    }

    /// Borrow the full history in publish order
    pub fn history(&self) -> &[Arc<Message>] {
        &self.messages
    }

    /// Topics with at least one subscriber
    pub fn topics(&self) -> Vec<String> {
        self.subscribers.keys().cloned().collect()
    }

    /// Number of handlers registered for a topic
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.subscribers.get(topic).map_or(0, Vec::len)
    }

    /// Number of messages in history
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if nothing has been published yet
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a message to history and hand back the shared copy
    pub(crate) fn record(&mut self, mut message: Message) -> Arc<Message> {
        if self.config.stamp_on_publish && message.timestamp.is_none() {
            message.timestamp = Some(Utc::now());
        }

        let message = Arc::new(message);
        self.messages.push(message.clone());
        trace!(topic = %message.topic, history = self.messages.len(), "Recorded message");
        message
    }

    pub(crate) fn handlers(&self, topic: &str) -> &[Arc<dyn Handler>] {
        self.subscribers
            .get(topic)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl fmt::Debug for MessageQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageQueue")
            .field("topics", &self.subscribers.len())
            .field("messages", &self.messages.len())
            .field("config", &self.config)
            .finish()
    }
}

/// Invoke handlers in order, stopping at the first failure
pub(crate) fn dispatch(message: &Arc<Message>, handlers: &[Arc<dyn Handler>]) -> crate::Result<()> {
    if handlers.is_empty() {
        debug!("No subscribers for topic: {}", message.topic);
        return Ok(());
    }

    for (index, handler) in handlers.iter().enumerate() {
        if let Err(source) = handler.handle(message) {
            warn!(
                topic = %message.topic,
                handler = handler.name(),
                index,
                skipped = handlers.len() - index - 1,
                "Handler failed: {}",
                source
            );
            return Err(crate::Error::Handler {
                topic: message.topic.clone(),
                index,
                source,
            });
        }
    }

    debug!(topic = %message.topic, delivered = handlers.len(), "Dispatched message");
    Ok(())
}

/// Invoke every handler and collect the outcomes
pub(crate) fn dispatch_collect(
    message: Arc<Message>,
    handlers: &[Arc<dyn Handler>],
) -> DispatchReport {
    let mut report = DispatchReport::new(message);
    if handlers.is_empty() {
        debug!("No subscribers for topic: {}", report.message.topic);
        return report;
    }

    for (index, handler) in handlers.iter().enumerate() {
        let result = handler.handle(&report.message);
        if let Err(e) = &result {
            warn!(
                topic = %report.message.topic,
                handler = handler.name(),
                index,
                "Handler failed: {}",
                e
            );
        }
        report.outcomes.push(DispatchOutcome {
            index,
            handler: handler.name().to_string(),
            result,
        });
    }

    report
}
