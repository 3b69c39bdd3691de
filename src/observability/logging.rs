//! Tracing subscriber setup for the binary.
//!
//! # Responsibilities
//! - Install the global subscriber that `TracingSink` writes into
//! - Pick the output format from the pass-through `sink` table
//!
//! # Design Decisions
//! - Channel targets (`request`, `response`, `system`) default to `trace`;
//!   channel levels already filtered them
//! - `RUST_LOG` overrides the default filter
//! - Calling `init` twice keeps the first subscriber

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LoggerConfig, SinkFormat};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,request=trace,response=trace,system=trace";

/// Install the global tracing subscriber. Returns false if one already existed.
pub fn init(config: &LoggerConfig) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.sink_format() {
        SinkFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
        SinkFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
        SinkFormat::Json => registry.with(fmt::layer().json()).try_init(),
    };

    result.is_ok()
}
