//! Event subsystem.
//!
//! # Data Flow
//! ```text
//! producer (HTTP host, loader, any component)
//!     → bus.rs (publish name + JSON payload)
//!     → binding.rs (name → extractor → LogRecord)
//!     → logging::ChannelRegistry (level filter → sink)
//! ```
//!
//! # Design Decisions
//! - Payloads are JSON values; field names are a compatibility contract
//! - Predefined events are a closed enum (kind.rs)
//! - Time is injected through `Clock` so elapsed durations are testable

pub mod binding;
pub mod bus;
pub mod clock;
pub mod kind;
pub mod payload;

pub use binding::{Binding, BindingTable, EventContext, ExtractError, Extractor};
pub use bus::{EventBus, Handler, InMemoryEventBus};
pub use clock::{Clock, ManualClock, SystemClock};
pub use kind::EventKind;
pub use payload::{CollectionDescriptor, RequestInfo, ResponseServer};
