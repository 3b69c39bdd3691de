//! In-process publish/subscribe bus.
//!
//! The dispatcher only needs `on`; hosts publish with `emit`. Delivery is
//! synchronous and ordered: handlers for one event run in subscription order
//! and finish before `emit` returns.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;

/// Subscriber callback.
pub type Handler = Arc<dyn Fn(&Value) + Send + Sync>;

/// EventBus trait for named events carrying JSON payloads.
pub trait EventBus: Send + Sync {
    /// Subscribe `handler` to `event`. Subscribing twice delivers twice.
    fn on(&self, event: &str, handler: Handler);

    /// Deliver `payload` to every handler of `event`. Returns how many ran.
    fn emit(&self, event: &str, payload: &Value) -> usize;

    /// Number of handlers subscribed to `event`.
    fn handler_count(&self, event: &str) -> usize;
}

impl dyn EventBus + '_ {
    /// Publish any payload convertible to JSON.
    pub fn publish(&self, event: &str, payload: impl Into<Value>) -> usize {
        self.emit(event, &payload.into())
    }
}

/// In-memory EventBus implementation.
/// Suitable for single-process deployments.
#[derive(Default)]
pub struct InMemoryEventBus {
    handlers: RwLock<HashMap<String, Vec<Handler>>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish any payload convertible to JSON.
    pub fn publish(&self, event: &str, payload: impl Into<Value>) -> usize {
        self.emit(event, &payload.into())
    }
}

impl EventBus for InMemoryEventBus {
    fn on(&self, event: &str, handler: Handler) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(event.to_string())
            .or_default()
            .push(handler);
    }

    fn emit(&self, event: &str, payload: &Value) -> usize {
        // Snapshot so handlers may publish or subscribe without deadlocking.
        let handlers: Vec<Handler> = match self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event)
        {
            Some(handlers) => handlers.clone(),
            None => return 0,
        };

        for handler in &handlers {
            handler(payload);
        }
        handlers.len()
    }

    fn handler_count(&self, event: &str) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event)
            .map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for InMemoryEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("InMemoryEventBus")
            .field("events", &handlers.len())
            .finish()
    }
}
