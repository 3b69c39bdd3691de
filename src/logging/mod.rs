//! Channels, severities and sinks.
//!
//! # Data Flow
//! ```text
//! LogRecord (channel, severity, message)
//!     → channel.rs (minimum severity check, per-channel lock)
//!     → sink.rs (TracingSink, MemorySink, or any Sink)
//! ```
//!
//! # Design Decisions
//! - Severity order: trace < debug < info < warn < error < fatal
//! - Suppressed records never reach the sink
//! - Sink failures stop at the channel boundary

pub mod channel;
pub mod record;
pub mod severity;
pub mod sink;

pub use channel::{create_channel, Channel, ChannelName, ChannelRegistry};
pub use record::LogRecord;
pub use severity::{compare_severity, should_emit, Severity};
pub use sink::{MemorySink, Sink, SinkError, TracingSink};
