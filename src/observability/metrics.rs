//! Metrics collection.
//!
//! # Metrics
//! - `event_logger_records_total` (counter): records written, by channel and severity
//! - `event_logger_records_suppressed_total` (counter): records below the channel level
//! - `event_logger_extraction_failures_total` (counter): payloads that could not be logged, by event
//! - `event_logger_sink_failures_total` (counter): failed sink writes, by channel
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the host installs an exporter if it wants one
//! - Without a recorder every call is a no-op

use metrics::counter;

use crate::logging::channel::ChannelName;
use crate::logging::severity::Severity;

pub fn record_emitted(channel: ChannelName, severity: Severity) {
    counter!(
        "event_logger_records_total",
        "channel" => channel.as_str(),
        "severity" => severity.as_str()
    )
    .increment(1);
}

pub fn record_suppressed(channel: ChannelName) {
    counter!("event_logger_records_suppressed_total", "channel" => channel.as_str()).increment(1);
}

pub fn record_extraction_failure(event: &str) {
    counter!("event_logger_extraction_failures_total", "event" => event.to_string()).increment(1);
}

pub fn record_sink_failure(channel: ChannelName) {
    counter!("event_logger_sink_failures_total", "channel" => channel.as_str()).increment(1);
}
