//! Severity levels and the level policy.
//!
//! Severities form a total order `trace < debug < info < warn < error < fatal`.
//! A record is emitted iff its severity is at or above the channel's minimum.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LoggerError;

/// Log severity, ordered from least to most important.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Very verbose diagnostics.
    Trace = 0,
    /// Developer diagnostics.
    Debug = 1,
    /// Normal operation milestones (requests, responses, collections loaded).
    Info = 2,
    /// Something unexpected that the process recovered from.
    Warn = 3,
    /// A failed operation.
    Error = 4,
    /// The process cannot continue.
    Fatal = 5,
}

impl Severity {
    /// All severities in ascending order.
    pub const ALL: [Severity; 6] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
    ];

    /// Lowercase name, also used as the event name of the passthrough bindings.
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Trace => "trace",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }

    /// Resolve a level name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|severity| severity.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| LoggerError::InvalidSeverity(s.to_string()))
    }
}

/// Three-way comparison: -1, 0 or 1.
pub fn compare_severity(a: Severity, b: Severity) -> i8 {
    match a.cmp(&b) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/// Whether a record at `severity` passes a channel configured at `min_severity`.
#[inline]
pub fn should_emit(min_severity: Severity, severity: Severity) -> bool {
    severity >= min_severity
}
