//! Last-resort logging of unrecoverable errors.

use std::sync::Arc;

use crate::dispatch::Dispatcher;
use crate::lifecycle::containment::contain;
use crate::lifecycle::runtime::{FatalError, ProcessRuntime};

/// Writes unrecoverable errors to the system channel at `fatal`.
#[derive(Debug)]
pub struct FatalGuard {
    dispatcher: Arc<Dispatcher>,
}

impl FatalGuard {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Create a guard and register it as the runtime's fatal hook.
    pub fn install(runtime: &dyn ProcessRuntime, dispatcher: Arc<Dispatcher>) -> Arc<Self> {
        let guard = Arc::new(Self::new(dispatcher));
        let hook = Arc::clone(&guard);
        runtime.set_fatal_hook(Box::new(move |error| hook.handle(error)));
        tracing::debug!("Fatal guard installed");
        guard
    }

    /// Log `error` synchronously. Never panics and never reports failure,
    /// so the runtime's default handling always proceeds.
    pub fn handle(&self, error: &FatalError) {
        let _ = contain(|| self.dispatcher.emit_fatal(error.to_string()));
    }
}
