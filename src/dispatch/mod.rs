//! Dispatcher subsystem.
//!
//! # Data Flow
//! ```text
//! Locator ("events") → Dispatcher::register
//!     → ChannelRegistry (from config)
//!     → BindingTable::predefined()
//!     → initialize: one bus subscription per binding
//!
//! Direct facade: trace/debug/info/warn/error/fatal → system channel
//! ```

pub mod dispatcher;
pub mod locator;

pub use dispatcher::Dispatcher;
pub use locator::{Locator, LocatorError, EVENTS, LOGGER};
