//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (level names → severities)
//!     → ChannelLevels (validated, immutable)
//!     → ChannelRegistry construction
//! ```
//!
//! # Design Decisions
//! - Config is read once; there is no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - The `sink` table is passed through untouched to the transport

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigurationError};
pub use schema::{ChannelLevels, ChannelOverrides, LoggerConfig, SinkFormat};
pub use validation::ValidationError;
