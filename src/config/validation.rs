//! Configuration validation.
//!
//! # Responsibilities
//! - Resolve level names to severities (serde only checks shape)
//! - Apply the default-level fallback chain: override, then `level`, then `info`
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: LoggerConfig → Result<ChannelLevels, Vec<ValidationError>>
//! - Runs before any channel exists

use crate::config::schema::{ChannelLevels, LoggerConfig, DEFAULT_LEVEL};
use crate::logging::channel::ChannelName;
use crate::logging::severity::Severity;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: unknown level {value:?} (expected trace, debug, info, warn, error or fatal)")]
    UnknownLevel { field: String, value: String },

    #[error("unknown channel {value:?} (expected request, response or system)")]
    UnknownChannel { value: String },

    #[error("expected the {expected} channel, found {found}")]
    MisplacedChannel {
        expected: ChannelName,
        found: ChannelName,
    },
}

fn resolve(field: &str, value: &str, errors: &mut Vec<ValidationError>) -> Option<Severity> {
    let severity = Severity::from_name(value);
    if severity.is_none() {
        errors.push(ValidationError::UnknownLevel {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    severity
}

/// Validate a configuration and compute the effective channel levels.
pub fn validate_config(config: &LoggerConfig) -> Result<ChannelLevels, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let default = match config.level.as_deref() {
        Some(name) => resolve("level", name, &mut errors).unwrap_or(DEFAULT_LEVEL),
        None => DEFAULT_LEVEL,
    };

    let mut channel_level = |name: ChannelName, value: Option<&str>| match value {
        Some(value) => {
            let field = format!("per_channel.{name}");
            resolve(&field, value, &mut errors).unwrap_or(default)
        }
        None => default,
    };

    let overrides = &config.per_channel;
    let levels = ChannelLevels {
        request: channel_level(ChannelName::Request, overrides.request.as_deref()),
        response: channel_level(ChannelName::Response, overrides.response.as_deref()),
        system: channel_level(ChannelName::System, overrides.system.as_deref()),
    };

    if errors.is_empty() {
        Ok(levels)
    } else {
        Err(errors)
    }
}
