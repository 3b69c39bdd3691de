//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.
//! Every field is optional; an empty file yields `info` on every channel.

use serde::{Deserialize, Serialize};

use crate::logging::severity::Severity;

/// Level used when the configuration names none.
pub const DEFAULT_LEVEL: Severity = Severity::Info;

/// Root configuration for the event logger.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct LoggerConfig {
    /// Default level name for all channels (trace, debug, info, warn, error, fatal).
    pub level: Option<String>,

    /// Per-channel level overrides.
    #[serde(alias = "perChannel")]
    pub per_channel: ChannelOverrides,

    /// Opaque settings handed through to the log transport.
    #[serde(alias = "sinkConfig")]
    pub sink: toml::Table,
}

/// Optional level names for individual channels.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ChannelOverrides {
    pub request: Option<String>,
    pub response: Option<String>,
    pub system: Option<String>,
}

/// Effective minimum severity of each channel after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelLevels {
    pub request: Severity,
    pub response: Severity,
    pub system: Severity,
}

impl ChannelLevels {
    /// Same level on every channel.
    pub const fn uniform(level: Severity) -> Self {
        Self {
            request: level,
            response: level,
            system: level,
        }
    }
}

impl Default for ChannelLevels {
    fn default() -> Self {
        Self::uniform(DEFAULT_LEVEL)
    }
}

/// Output format of the tracing subscriber installed by the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl LoggerConfig {
    /// Configuration with a single default level and nothing else.
    pub fn with_level(level: impl Into<String>) -> Self {
        Self {
            level: Some(level.into()),
            ..Self::default()
        }
    }

    /// Read `sink.format`, falling back to compact output when absent or unrecognized.
    pub fn sink_format(&self) -> SinkFormat {
        self.sink
            .get("format")
            .and_then(|value| value.clone().try_into().ok())
            .unwrap_or_default()
    }
}
