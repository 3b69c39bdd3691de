//! Output sinks.
//!
//! # Responsibilities
//! - Accept finished `LogRecord`s from channels
//! - Hide the transport (tracing subscriber, memory buffer, ...)
//!
//! # Design Decisions
//! - `write` is treated as one opaque call; the channel serializes access to it
//! - Failures are reported to the channel but never retried

use std::sync::{Mutex, PoisonError};

use crate::logging::channel::ChannelName;
use crate::logging::record::LogRecord;
use crate::logging::severity::Severity;

/// Error returned by a sink write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("sink write failed: {0}")]
pub struct SinkError(pub String);

/// Transport that durably records or displays log records.
pub trait Sink: Send + Sync {
    fn write(&self, record: &LogRecord) -> Result<(), SinkError>;
}

/// Forwards records into the `tracing` ecosystem.
///
/// The tracing target is the channel name (`request`, `response`, `system`),
/// so subscribers can route or filter channels independently. `fatal` has no
/// tracing level of its own and is emitted at ERROR with `fatal = true`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

macro_rules! channel_event {
    ($target:literal, $record:expr) => {{
        let record = $record;
        match record.severity {
            Severity::Trace => {
                tracing::trace!(target: $target, channel = $target, severity = "trace", "{}", record.message)
            }
            Severity::Debug => {
                tracing::debug!(target: $target, channel = $target, severity = "debug", "{}", record.message)
            }
            Severity::Info => {
                tracing::info!(target: $target, channel = $target, severity = "info", "{}", record.message)
            }
            Severity::Warn => {
                tracing::warn!(target: $target, channel = $target, severity = "warn", "{}", record.message)
            }
            Severity::Error => {
                tracing::error!(target: $target, channel = $target, severity = "error", "{}", record.message)
            }
            Severity::Fatal => {
                tracing::error!(target: $target, channel = $target, severity = "fatal", fatal = true, "{}", record.message)
            }
        }
    }};
}

impl Sink for TracingSink {
    fn write(&self, record: &LogRecord) -> Result<(), SinkError> {
        match record.channel {
            ChannelName::Request => channel_event!("request", record),
            ChannelName::Response => channel_event!("response", record),
            ChannelName::System => channel_event!("system", record),
        }
        Ok(())
    }
}

/// In-memory sink that keeps every record it receives.
///
/// Useful for embedding hosts that want to inspect output, and for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records written so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Records written to one channel, in order.
    pub fn records_for(&self, channel: ChannelName) -> Vec<LogRecord> {
        self.records()
            .into_iter()
            .filter(|record| record.channel == channel)
            .collect()
    }

    /// Messages written to one channel, in order.
    pub fn messages_for(&self, channel: ChannelName) -> Vec<String> {
        self.records_for(channel)
            .into_iter()
            .map(|record| record.message)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove and return everything written so far.
    pub fn take(&self) -> Vec<LogRecord> {
        std::mem::take(&mut *self.records.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Sink for MemorySink {
    fn write(&self, record: &LogRecord) -> Result<(), SinkError> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }
}
