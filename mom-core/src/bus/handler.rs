//! Subscriber capability trait

use super::message::Message;
use std::fmt;
use std::sync::Arc;

/// Errors a handler may report back to the publisher
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("Handler failed: {0}")]
    Failed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type HandlerResult = std::result::Result<(), HandlerError>;

/// Trait for message subscribers
///
/// Handlers are invoked synchronously on the publishing thread, once per
/// matching publish, in the order they were subscribed.
pub trait Handler: Send + Sync {
    /// Receive a published message
    fn handle(&self, message: &Arc<Message>) -> HandlerResult;

    /// Name used in logs and dispatch reports
    fn name(&self) -> &str {
        "handler"
    }
}

/// Adapter turning a closure into a [`Handler`]
pub struct FnHandler<F> {
    name: String,
    f: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&Arc<Message>) -> HandlerResult + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Handler for FnHandler<F>
where
    F: Fn(&Arc<Message>) -> HandlerResult + Send + Sync,
{
    fn handle(&self, message: &Arc<Message>) -> HandlerResult {
        (self.f)(message)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").field("name", &self.name).finish()
    }
}

/// Wrap a closure as a shareable handler
pub fn handler_fn<F>(name: impl Into<String>, f: F) -> Arc<dyn Handler>
where
    F: Fn(&Arc<Message>) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(FnHandler::new(name, f))
}
