//! HTTP host subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, event middleware)
//!     → request.rs (request ID, RequestInfo payload)
//!     → bus: incomingMessage
//!     → handler
//!     → bus: responseServer
//!     → client
//! ```

pub mod request;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
