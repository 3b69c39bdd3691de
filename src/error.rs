//! Top-level error type of the logger.

use crate::config::ConfigurationError;
use crate::dispatch::locator::LocatorError;

/// Errors surfaced by the logger's public entry points.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Bad configuration at construction time.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A severity name outside trace/debug/info/warn/error/fatal.
    #[error("invalid severity {0:?}")]
    InvalidSeverity(String),

    /// A collaborator was missing from the service locator.
    #[error(transparent)]
    Locator(#[from] LocatorError),
}
