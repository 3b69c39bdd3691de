//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Channels and bindings produce:
//!     → metrics.rs (emitted / suppressed / failure counters)
//!     → tracing events (TracingSink records, dispatcher diagnostics)
//!
//! Consumers:
//!     → logging.rs (fmt subscriber: compact, pretty or json)
//!     → any metrics recorder the host installs
//! ```

pub mod logging;
pub mod metrics;
