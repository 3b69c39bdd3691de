//! Log records handed to sinks.

use std::time::SystemTime;

use crate::logging::channel::ChannelName;
use crate::logging::severity::Severity;

/// A single formatted log line bound for one channel.
///
/// Built by an event binding or the direct facade, consumed once by the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub channel: ChannelName,
    pub severity: Severity,
    pub message: String,
    /// Assigned when the record is built, which happens in the same call that emits it.
    pub timestamp: SystemTime,
}

impl LogRecord {
    pub fn new(channel: ChannelName, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            channel,
            severity,
            message: message.into(),
            timestamp: SystemTime::now(),
        }
    }

    /// Record on the system channel, used by the facade and the passthrough bindings.
    pub fn system(severity: Severity, message: impl Into<String>) -> Self {
        Self::new(ChannelName::System, severity, message)
    }
}
