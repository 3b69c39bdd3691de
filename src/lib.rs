//! Event-driven logging dispatcher.
//!
//! Subscribes to an in-process event bus and turns named application events
//! (request arrival, response completion, lifecycle milestones, diagnostic
//! messages, fatal failures) into leveled records on three channels:
//! request, response and system.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod http;
pub mod lifecycle;
pub mod logging;
pub mod observability;

pub use config::{load_config, ConfigurationError, LoggerConfig};
pub use dispatch::{Dispatcher, Locator};
pub use error::LoggerError;
pub use events::{BindingTable, EventBus, EventKind, InMemoryEventBus};
pub use lifecycle::{FatalError, FatalGuard, PanicRuntime};
pub use logging::{ChannelName, LogRecord, Severity};
