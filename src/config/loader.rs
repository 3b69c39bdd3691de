//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::{ChannelLevels, LoggerConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error raised while building the logger from configuration.
///
/// Always fatal to initialization.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<Vec<ValidationError>> for ConfigurationError {
    fn from(errors: Vec<ValidationError>) -> Self {
        ConfigurationError::Validation(errors)
    }
}

impl LoggerConfig {
    /// Parse a configuration from TOML text without validating it.
    pub fn from_toml(content: &str) -> Result<Self, ConfigurationError> {
        Ok(toml::from_str(content)?)
    }

    /// Effective level of every channel, or every bad level name.
    pub fn resolve_levels(&self) -> Result<ChannelLevels, ConfigurationError> {
        Ok(validate_config(self)?)
    }
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<LoggerConfig, ConfigurationError> {
    let content = fs::read_to_string(path)?;
    let config = LoggerConfig::from_toml(&content)?;

    validate_config(&config)?;

    Ok(config)
}
