//! Named output channels and their registry.
//!
//! # Responsibilities
//! - Own the three channels (request, response, system)
//! - Apply each channel's minimum severity before touching the sink
//! - Serialize sink writes per channel
//!
//! # Design Decisions
//! - Channels are created once from validated configuration and never mutated
//! - A bad level name fails construction, not the first log call
//! - One mutex per channel; records from concurrent threads never interleave

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError, TryLockError};

use serde::{Deserialize, Serialize};

use crate::config::schema::ChannelLevels;
use crate::config::validation::ValidationError;
use crate::config::ConfigurationError;
use crate::logging::record::LogRecord;
use crate::logging::severity::{should_emit, Severity};
use crate::logging::sink::{Sink, SinkError};
use crate::observability::metrics;

/// Identity of a logging channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelName {
    /// Incoming requests.
    Request,
    /// Completed responses with timing.
    Response,
    /// Lifecycle milestones, diagnostics and fatal errors.
    System,
}

impl ChannelName {
    pub const ALL: [ChannelName; 3] = [
        ChannelName::Request,
        ChannelName::Response,
        ChannelName::System,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ChannelName::Request => "request",
            ChannelName::Response => "response",
            ChannelName::System => "system",
        }
    }

    const fn index(self) -> usize {
        match self {
            ChannelName::Request => 0,
            ChannelName::Response => 1,
            ChannelName::System => 2,
        }
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownChannel {
                value: s.to_string(),
            })
    }
}

/// A named output stream with its own severity filter.
pub struct Channel {
    name: ChannelName,
    min_severity: Severity,
    sink: Arc<dyn Sink>,
    write_lock: Mutex<()>,
}

impl Channel {
    pub fn new(name: ChannelName, min_severity: Severity, sink: Arc<dyn Sink>) -> Self {
        Self {
            name,
            min_severity,
            sink,
            write_lock: Mutex::new(()),
        }
    }

    pub fn name(&self) -> ChannelName {
        self.name
    }

    pub fn min_severity(&self) -> Severity {
        self.min_severity
    }

    /// Level policy for this channel.
    #[inline]
    pub fn should_emit(&self, severity: Severity) -> bool {
        should_emit(self.min_severity, severity)
    }

    /// Write a record if it passes the level filter.
    ///
    /// Returns `Ok(false)` when the record was suppressed. Suppression has no
    /// side effect beyond a metrics counter.
    pub fn emit(&self, record: &LogRecord) -> Result<bool, SinkError> {
        if !self.should_emit(record.severity) {
            metrics::record_suppressed(self.name);
            return Ok(false);
        }

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.write_locked(record)
    }

    /// Like [`Channel::emit`], but gives up after `attempts` failed lock tries.
    ///
    /// Used from the fatal path, where the current thread may already hold
    /// this channel's lock.
    pub(crate) fn try_emit(&self, record: &LogRecord, attempts: usize) -> Result<bool, SinkError> {
        if !self.should_emit(record.severity) {
            metrics::record_suppressed(self.name);
            return Ok(false);
        }

        for _ in 0..attempts {
            match self.write_lock.try_lock() {
                Ok(_guard) => return self.write_locked(record),
                Err(TryLockError::Poisoned(poisoned)) => {
                    let _guard = poisoned.into_inner();
                    return self.write_locked(record);
                }
                Err(TryLockError::WouldBlock) => std::thread::yield_now(),
            }
        }

        Err(SinkError(format!("{} channel is busy", self.name)))
    }

    fn write_locked(&self, record: &LogRecord) -> Result<bool, SinkError> {
        match self.sink.write(record) {
            Ok(()) => {
                metrics::record_emitted(self.name, record.severity);
                Ok(true)
            }
            Err(e) => {
                metrics::record_sink_failure(self.name);
                Err(e)
            }
        }
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("min_severity", &self.min_severity)
            .finish_non_exhaustive()
    }
}

/// Create one channel from a channel name and a configured level name.
pub fn create_channel(
    name: &str,
    configured_level: &str,
    sink: Arc<dyn Sink>,
) -> Result<Channel, ConfigurationError> {
    let mut errors = Vec::new();

    let channel = name.parse::<ChannelName>().map_err(|e| errors.push(e)).ok();
    let severity = Severity::from_name(configured_level);
    if severity.is_none() {
        errors.push(ValidationError::UnknownLevel {
            field: name.to_string(),
            value: configured_level.to_string(),
        });
    }

    match (channel, severity) {
        (Some(channel), Some(severity)) => Ok(Channel::new(channel, severity, sink)),
        _ => Err(ConfigurationError::Validation(errors)),
    }
}

/// Owns the request, response and system channels.
#[derive(Debug)]
pub struct ChannelRegistry {
    channels: [Channel; 3],
}

impl ChannelRegistry {
    /// Build all three channels over a shared sink.
    pub fn new(levels: ChannelLevels, sink: Arc<dyn Sink>) -> Self {
        Self {
            channels: [
                Channel::new(ChannelName::Request, levels.request, Arc::clone(&sink)),
                Channel::new(ChannelName::Response, levels.response, Arc::clone(&sink)),
                Channel::new(ChannelName::System, levels.system, sink),
            ],
        }
    }

    /// Build from individually constructed channels.
    ///
    /// Fails if the channels are not exactly request, response and system.
    pub fn from_channels(
        request: Channel,
        response: Channel,
        system: Channel,
    ) -> Result<Self, ConfigurationError> {
        let channels = [request, response, system];
        let errors: Vec<ValidationError> = channels
            .iter()
            .zip(ChannelName::ALL)
            .filter(|(channel, expected)| channel.name() != *expected)
            .map(|(channel, expected)| ValidationError::MisplacedChannel {
                expected,
                found: channel.name(),
            })
            .collect();

        if errors.is_empty() {
            Ok(Self { channels })
        } else {
            Err(ConfigurationError::Validation(errors))
        }
    }

    pub fn get(&self, name: ChannelName) -> &Channel {
        &self.channels[name.index()]
    }

    /// Effective levels of all three channels.
    pub fn levels(&self) -> ChannelLevels {
        ChannelLevels {
            request: self.get(ChannelName::Request).min_severity(),
            response: self.get(ChannelName::Response).min_severity(),
            system: self.get(ChannelName::System).min_severity(),
        }
    }

    /// Route a record to its channel.
    pub fn emit(&self, record: &LogRecord) -> Result<bool, SinkError> {
        self.get(record.channel).emit(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::sink::MemorySink;

    fn levels(level: Severity) -> ChannelLevels {
        ChannelLevels {
            request: level,
            response: level,
            system: level,
        }
    }

    #[test]
    fn test_channel_suppresses_below_level() {
        let sink = Arc::new(MemorySink::new());
        let channel = Channel::new(ChannelName::System, Severity::Warn, sink.clone());

        assert!(!channel.emit(&LogRecord::system(Severity::Info, "quiet")).unwrap());
        assert!(channel.emit(&LogRecord::system(Severity::Warn, "boundary")).unwrap());
        assert!(channel.emit(&LogRecord::system(Severity::Fatal, "loud")).unwrap());

        assert_eq!(
            sink.messages_for(ChannelName::System),
            vec!["boundary".to_string(), "loud".to_string()]
        );
    }

    #[test]
    fn test_create_channel_accepts_any_case() {
        let channel = create_channel("Request", "DEBUG", Arc::new(MemorySink::new())).unwrap();
        assert_eq!(channel.name(), ChannelName::Request);
        assert_eq!(channel.min_severity(), Severity::Debug);
    }

    #[test]
    fn test_create_channel_rejects_unknown_level() {
        let err = create_channel("system", "loud", Arc::new(MemorySink::new())).unwrap_err();
        match err {
            ConfigurationError::Validation(errors) => {
                assert_eq!(
                    errors,
                    vec![ValidationError::UnknownLevel {
                        field: "system".into(),
                        value: "loud".into(),
                    }]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_create_channel_reports_name_and_level_together() {
        let err = create_channel("audit", "loud", Arc::new(MemorySink::new())).unwrap_err();
        assert!(matches!(err, ConfigurationError::Validation(ref errors) if errors.len() == 2));
    }

    #[test]
    fn test_registry_routes_by_channel() {
        let sink = Arc::new(MemorySink::new());
        let registry = ChannelRegistry::new(levels(Severity::Info), sink.clone());

        registry
            .emit(&LogRecord::new(ChannelName::Request, Severity::Info, "req"))
            .unwrap();
        registry
            .emit(&LogRecord::new(ChannelName::Response, Severity::Debug, "dropped"))
            .unwrap();

        assert_eq!(sink.messages_for(ChannelName::Request), vec!["req".to_string()]);
        assert!(sink.messages_for(ChannelName::Response).is_empty());
    }

    #[test]
    fn test_from_channels_checks_order() {
        let sink: Arc<dyn Sink> = Arc::new(MemorySink::new());
        let result = ChannelRegistry::from_channels(
            Channel::new(ChannelName::System, Severity::Info, sink.clone()),
            Channel::new(ChannelName::Response, Severity::Info, sink.clone()),
            Channel::new(ChannelName::Request, Severity::Info, sink),
        );
        assert!(matches!(result, Err(ConfigurationError::Validation(ref e)) if e.len() == 2));
    }

    #[test]
    fn test_try_emit_gives_up_when_lock_is_held() {
        let channel = Channel::new(ChannelName::System, Severity::Trace, Arc::new(MemorySink::new()));
        let _held = channel.write_lock.lock().unwrap();
        let record = LogRecord::system(Severity::Fatal, "boom");
        assert!(channel.try_emit(&record, 3).is_err());
    }
}
