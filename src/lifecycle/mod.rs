//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → Dispatcher::register → FatalGuard::install → serve
//!
//! Unrecoverable error (runtime.rs):
//!     panic / fatal error → ProcessRuntime hook → FatalGuard → system channel (fatal)
//!     → runtime default behavior (print, unwind or abort)
//! ```
//!
//! # Design Decisions
//! - The guard is installed explicitly, never as an import side effect
//! - The guard swallows its own failures so termination always proceeds
//! - Logging code runs contained (containment.rs); its panics are not fatal

pub mod containment;
pub mod fatal_guard;
pub mod runtime;

pub use fatal_guard::FatalGuard;
pub use runtime::{FatalError, FatalHook, PanicRuntime, ProcessRuntime};
