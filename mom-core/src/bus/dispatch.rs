//! Per-handler dispatch results

use super::handler::HandlerError;
use super::message::Message;
use std::sync::Arc;

/// Outcome of invoking a single handler
#[derive(Debug)]
pub struct DispatchOutcome {
    /// Position of the handler in the topic's subscription list
    pub index: usize,
    /// Handler name
    pub handler: String,
    /// Result returned by the handler
    pub result: Result<(), HandlerError>,
}

impl DispatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Aggregated result of a publish that invokes every handler
#[derive(Debug)]
pub struct DispatchReport {
    /// The published message
    pub message: Arc<Message>,
    /// One entry per invoked handler, in invocation order
    pub outcomes: Vec<DispatchOutcome>,
}

impl DispatchReport {
    pub(crate) fn new(message: Arc<Message>) -> Self {
        Self {
            message,
            outcomes: Vec::new(),
        }
    }

    /// Number of handlers invoked
    pub fn delivered(&self) -> usize {
        self.outcomes.len()
    }

    /// True when every handler succeeded (or none were registered)
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(DispatchOutcome::is_ok)
    }

    /// Iterate over the failed handlers
    pub fn failures(&self) -> impl Iterator<Item = &DispatchOutcome> {
        self.outcomes.iter().filter(|o| !o.is_ok())
    }
}
