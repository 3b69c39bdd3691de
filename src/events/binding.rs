//! Event binding table: event name → log record construction.
//!
//! # Responsibilities
//! - Map each event name to the logic that builds its `LogRecord`
//! - Build the predefined bindings (requests, responses, collections, passthrough)
//! - Contain extraction failures so a bad payload never escapes `dispatch`
//!
//! # Design Decisions
//! - Predefined events are a closed enum; arbitrary events use a custom closure
//! - Unknown event names are ignored: the bus carries unrelated traffic too
//! - Re-registering a name replaces the previous binding (last wins)
//! - A failed extraction becomes one `warn` record on the system channel

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::events::clock::Clock;
use crate::events::kind::EventKind;
use crate::events::payload::render_value;
use crate::lifecycle::containment::contain;
use crate::logging::channel::{ChannelName, ChannelRegistry};
use crate::logging::record::LogRecord;
use crate::logging::severity::Severity;
use crate::observability::metrics;

/// Why a payload could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("missing field `{field}`")]
    MissingField { event: String, field: String },

    #[error("field `{field}` is not {expected}")]
    WrongShape {
        event: String,
        field: String,
        expected: &'static str,
    },

    #[error("extractor panicked: {message}")]
    Panicked { event: String, message: String },
}

impl ExtractError {
    /// Name of the event whose payload failed.
    pub fn event(&self) -> &str {
        match self {
            ExtractError::MissingField { event, .. }
            | ExtractError::WrongShape { event, .. }
            | ExtractError::Panicked { event, .. } => event,
        }
    }
}

/// What an extractor sees: the event name, its payload and the clock.
pub struct EventContext<'a> {
    pub name: &'a str,
    pub payload: &'a Value,
    pub clock: &'a dyn Clock,
}

impl<'a> EventContext<'a> {
    pub fn new(name: &'a str, payload: &'a Value, clock: &'a dyn Clock) -> Self {
        Self {
            name,
            payload,
            clock,
        }
    }

    /// Look up a dotted path such as `request.startTime`. `null` counts as absent.
    pub fn field(&self, path: &str) -> Option<&'a Value> {
        path.split('.')
            .try_fold(self.payload, |value, key| value.get(key))
            .filter(|value| !value.is_null())
    }

    fn missing(&self, path: &str) -> ExtractError {
        ExtractError::MissingField {
            event: self.name.to_string(),
            field: path.to_string(),
        }
    }

    fn wrong_shape(&self, path: &str, expected: &'static str) -> ExtractError {
        ExtractError::WrongShape {
            event: self.name.to_string(),
            field: path.to_string(),
            expected,
        }
    }

    /// Required scalar rendered as text (strings verbatim, numbers and booleans formatted).
    pub fn text(&self, path: &str) -> Result<String, ExtractError> {
        let value = self.field(path).ok_or_else(|| self.missing(path))?;
        self.scalar(path, value)
    }

    /// Optional scalar; absent or `null` yields `None`.
    pub fn optional_text(&self, path: &str) -> Result<Option<String>, ExtractError> {
        self.field(path)
            .map(|value| self.scalar(path, value))
            .transpose()
    }

    /// Required non-negative integer of milliseconds.
    pub fn millis(&self, path: &str) -> Result<u64, ExtractError> {
        let value = self.field(path).ok_or_else(|| self.missing(path))?;
        value
            .as_u64()
            .or_else(|| value.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .ok_or_else(|| self.wrong_shape(path, "a non-negative number"))
    }

    /// Required field of any shape except `null`.
    pub fn value(&self, path: &str) -> Result<&'a Value, ExtractError> {
        self.field(path).ok_or_else(|| self.missing(path))
    }

    fn scalar(&self, path: &str, value: &Value) -> Result<String, ExtractError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            _ => Err(self.wrong_shape(path, "a string")),
        }
    }
}

/// Closure building a record for an event outside the predefined set.
pub type Extractor =
    Arc<dyn Fn(&EventContext<'_>) -> Result<LogRecord, ExtractError> + Send + Sync>;

/// Rule mapping one event name to record construction.
#[derive(Clone)]
pub enum Binding {
    Predefined(EventKind),
    Custom(Extractor),
}

impl Binding {
    pub fn custom<F>(extractor: F) -> Self
    where
        F: Fn(&EventContext<'_>) -> Result<LogRecord, ExtractError> + Send + Sync + 'static,
    {
        Binding::Custom(Arc::new(extractor))
    }

    /// Build the record for one event. Does not catch panics.
    pub fn extract(&self, ctx: &EventContext<'_>) -> Result<LogRecord, ExtractError> {
        match self {
            Binding::Predefined(kind) => extract_predefined(*kind, ctx),
            Binding::Custom(extractor) => extractor(ctx),
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Predefined(kind) => f.debug_tuple("Predefined").field(kind).finish(),
            Binding::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn extract_predefined(kind: EventKind, ctx: &EventContext<'_>) -> Result<LogRecord, ExtractError> {
    let record = match kind {
        EventKind::IncomingMessage => LogRecord::new(
            ChannelName::Request,
            Severity::Info,
            format!(
                "[{}] {} {}",
                ctx.text("requestId")?,
                ctx.text("method")?,
                ctx.text("url")?
            ),
        ),
        EventKind::ResponseServer => {
            let elapsed = ctx.clock.elapsed_since(ctx.millis("request.startTime")?);
            let remote_addr = ctx.optional_text("request.remoteAddr")?.unwrap_or_default();
            LogRecord::new(
                ChannelName::Response,
                Severity::Info,
                format!(
                    "[{}] {} - - ({}ms) {} {} {}",
                    ctx.text("request.requestId")?,
                    remote_addr,
                    elapsed,
                    ctx.text("request.method")?,
                    ctx.text("request.url")?,
                    render_value(ctx.value("response")?)
                ),
            )
        }
        EventKind::CollectionFound => {
            LogRecord::system(Severity::Info, format!("Collection {} found", ctx.text("name")?))
        }
        EventKind::CollectionLoaded => {
            LogRecord::system(Severity::Info, format!("Collection {} loaded", ctx.text("name")?))
        }
        EventKind::AllCollectionsLoaded => LogRecord::system(Severity::Info, "All collections loaded"),
        EventKind::Forwarding => LogRecord::system(Severity::Info, render_value(ctx.payload)),
        EventKind::Level(severity) => LogRecord::system(severity, render_value(ctx.payload)),
    };
    Ok(record)
}

/// Mapping from event name to binding, unique per name.
#[derive(Clone, Default, Debug)]
pub struct BindingTable {
    bindings: HashMap<String, Binding>,
}

impl BindingTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding every predefined binding.
    pub fn predefined() -> Self {
        let mut table = Self::new();
        for kind in EventKind::ALL {
            table.register(kind.name(), Binding::Predefined(kind));
        }
        table
    }

    /// Register a binding. Returns the binding it replaced, if any.
    pub fn register(&mut self, name: impl Into<String>, binding: Binding) -> Option<Binding> {
        let name = name.into();
        let previous = self.bindings.insert(name.clone(), binding);
        if previous.is_some() {
            tracing::warn!(event = %name, "Event binding replaced; last registration wins");
        }
        previous
    }

    /// Register a custom extractor closure.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, extractor: F) -> Option<Binding>
    where
        F: Fn(&EventContext<'_>) -> Result<LogRecord, ExtractError> + Send + Sync + 'static,
    {
        self.register(name, Binding::custom(extractor))
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Registered event names, sorted.
    pub fn event_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build the record for an event.
    ///
    /// `None` when no binding exists. Panics inside the extractor are caught
    /// and reported as [`ExtractError::Panicked`].
    pub fn extract(
        &self,
        name: &str,
        payload: &Value,
        clock: &dyn Clock,
    ) -> Option<Result<LogRecord, ExtractError>> {
        let binding = self.bindings.get(name)?;
        let ctx = EventContext::new(name, payload, clock);

        Some(contain(|| binding.extract(&ctx)).unwrap_or_else(|message| {
            Err(ExtractError::Panicked {
                event: name.to_string(),
                message,
            })
        }))
    }

    /// Look up, build and emit the record for an event.
    ///
    /// Unknown names are a silent no-op. Extraction failures become a single
    /// `warn` record on the system channel naming the event. Sink failures,
    /// panics included, are dropped.
    pub fn dispatch(&self, registry: &ChannelRegistry, clock: &dyn Clock, name: &str, payload: &Value) {
        let record = match self.extract(name, payload, clock) {
            None => return,
            Some(Ok(record)) => record,
            Some(Err(err)) => {
                metrics::record_extraction_failure(name);
                tracing::debug!(event = %name, error = %err, "Event payload rejected");
                LogRecord::system(Severity::Warn, format!("Unable to log event {name}: {err}"))
            }
        };

        let error = match contain(|| registry.emit(&record)) {
            Ok(Ok(_)) => return,
            Ok(Err(e)) => e.to_string(),
            Err(panic) => {
                metrics::record_sink_failure(record.channel);
                format!("sink panicked: {panic}")
            }
        };
        tracing::debug!(event = %name, channel = %record.channel, error = %error, "Sink write failed");
    }
}
