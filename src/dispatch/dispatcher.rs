//! Event-to-log dispatcher and direct logging facade.
//!
//! # Responsibilities
//! - Build channels and bindings from configuration
//! - Subscribe every binding to the event bus
//! - Offer `trace` .. `fatal` for callers that log directly
//!
//! # Design Decisions
//! - Initialization is not idempotent: calling `initialize` twice subscribes twice
//! - Nothing on the logging path returns an error or panics out to the caller

use std::fmt::{self, Display};
use std::sync::Arc;

use serde_json::Value;

use crate::config::{ConfigurationError, LoggerConfig};
use crate::dispatch::locator::{Locator, EVENTS, LOGGER};
use crate::error::LoggerError;
use crate::events::binding::BindingTable;
use crate::events::bus::EventBus;
use crate::events::clock::{Clock, SystemClock};
use crate::lifecycle::containment::contain;
use crate::logging::channel::{ChannelName, ChannelRegistry};
use crate::logging::record::LogRecord;
use crate::logging::severity::Severity;
use crate::logging::sink::{Sink, SinkError};

/// Lock attempts made by the fatal path before giving up on the system channel.
const FATAL_LOCK_ATTEMPTS: usize = 1_000;

/// Owns the channels and the binding table for the process lifetime.
pub struct Dispatcher {
    registry: ChannelRegistry,
    bindings: BindingTable,
    clock: Arc<dyn Clock>,
}

impl Dispatcher {
    pub fn new(registry: ChannelRegistry, bindings: BindingTable, clock: Arc<dyn Clock>) -> Self {
        Self {
            registry,
            bindings,
            clock,
        }
    }

    /// Predefined bindings and the system clock over channels built from `config`.
    pub fn from_config(config: &LoggerConfig, sink: Arc<dyn Sink>) -> Result<Self, ConfigurationError> {
        let levels = config.resolve_levels()?;
        Ok(Self::new(
            ChannelRegistry::new(levels, sink),
            BindingTable::predefined(),
            Arc::new(SystemClock),
        ))
    }

    /// Construction entry point for hosts using a [`Locator`].
    ///
    /// Resolves the bus registered as `"events"` (an `Arc<dyn EventBus>`),
    /// subscribes the predefined bindings and registers the dispatcher as
    /// `"logger"`.
    pub fn register(
        locator: &Locator,
        config: &LoggerConfig,
        sink: Arc<dyn Sink>,
    ) -> Result<Arc<Self>, LoggerError> {
        let bus: Arc<dyn EventBus> = locator.resolve(EVENTS)?;
        let dispatcher = Arc::new(Self::from_config(config, sink)?);
        dispatcher.initialize(bus.as_ref());
        locator.register_instance(LOGGER, Arc::clone(&dispatcher));
        Ok(dispatcher)
    }

    /// Subscribe one handler per binding. Call once per process.
    pub fn initialize(self: &Arc<Self>, bus: &dyn EventBus) {
        let names = self.bindings.event_names();
        for name in &names {
            let dispatcher = Arc::clone(self);
            let event = name.to_string();
            bus.on(
                name,
                Arc::new(move |payload: &Value| dispatcher.dispatch(&event, payload)),
            );
        }

        let levels = self.registry.levels();
        tracing::info!(
            events = names.len(),
            request = %levels.request,
            response = %levels.response,
            system = %levels.system,
            "Event logger initialized"
        );
    }

    /// Handle one event as if delivered by the bus.
    pub fn dispatch(&self, event: &str, payload: &Value) {
        self.bindings
            .dispatch(&self.registry, self.clock.as_ref(), event, payload);
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Log `message` on the system channel at `severity`.
    pub fn log(&self, severity: Severity, message: impl Display) {
        self.emit_system(LogRecord::system(severity, message.to_string()));
    }

    /// Log several values joined by single spaces.
    pub fn log_args(&self, severity: Severity, args: &[&dyn Display]) {
        let message = args
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        self.emit_system(LogRecord::system(severity, message));
    }

    /// Log with a severity given by name.
    pub fn log_named(&self, severity: &str, message: impl Display) -> Result<(), LoggerError> {
        let severity = severity.parse::<Severity>()?;
        self.log(severity, message);
        Ok(())
    }

    /// Severity by name, several values joined by single spaces.
    ///
    /// An unknown name logs nothing and returns [`LoggerError::InvalidSeverity`].
    pub fn log_named_args(&self, severity: &str, args: &[&dyn Display]) -> Result<(), LoggerError> {
        let severity = severity.parse::<Severity>()?;
        self.log_args(severity, args);
        Ok(())
    }

    pub fn trace(&self, message: impl Display) {
        self.log(Severity::Trace, message);
    }

    pub fn debug(&self, message: impl Display) {
        self.log(Severity::Debug, message);
    }

    pub fn info(&self, message: impl Display) {
        self.log(Severity::Info, message);
    }

    pub fn warn(&self, message: impl Display) {
        self.log(Severity::Warn, message);
    }

    pub fn error(&self, message: impl Display) {
        self.log(Severity::Error, message);
    }

    pub fn fatal(&self, message: impl Display) {
        self.log(Severity::Fatal, message);
    }

    /// Fatal record on the system channel without blocking on its lock.
    pub(crate) fn emit_fatal(&self, message: String) -> Result<bool, SinkError> {
        self.registry
            .get(ChannelName::System)
            .try_emit(&LogRecord::system(Severity::Fatal, message), FATAL_LOCK_ATTEMPTS)
    }

    fn emit_system(&self, record: LogRecord) {
        match contain(|| self.registry.emit(&record)) {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => tracing::debug!(error = %e, "Sink write failed"),
            Err(panic) => tracing::debug!(panic = %panic, "Sink panicked"),
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("levels", &self.registry.levels())
            .field("events", &self.bindings.event_names())
            .finish_non_exhaustive()
    }
}
