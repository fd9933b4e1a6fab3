//! Message bus for decoupled communication
//!
//! Producers publish topic-tagged messages; handlers subscribed to a topic are
//! invoked synchronously, in subscription order, for every matching publish.
//! Every message is kept in an append-only history that can be queried by
//! topic.

pub mod dispatch;
pub mod global;
pub mod handler;
pub mod message;
pub mod queue;
pub mod shared;

pub use dispatch::{DispatchOutcome, DispatchReport};
pub use global::{default_queue, publish_message, subscribe_fn_to_topic, subscribe_to_topic};
pub use handler::{handler_fn, FnHandler, Handler, HandlerError, HandlerResult};
pub use message::{payload_repr, Message, Payload};
pub use queue::MessageQueue;
pub use shared::SharedQueue;
