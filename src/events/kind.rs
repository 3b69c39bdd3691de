//! Names of the events this crate knows how to log.
//!
//! The string names are a public contract: any component may publish them
//! and expect the documented log line.

use std::fmt;

use crate::logging::severity::Severity;

/// Closed set of predefined events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A request arrived.
    IncomingMessage,
    /// A response was sent.
    ResponseServer,
    /// A collection descriptor was discovered.
    CollectionFound,
    /// A collection finished loading.
    CollectionLoaded,
    /// Every collection finished loading.
    AllCollectionsLoaded,
    /// Free-form message forwarded from another component.
    Forwarding,
    /// Free-form message at a fixed severity, named after that severity.
    Level(Severity),
}

impl EventKind {
    /// Every predefined event, in registration order.
    pub const ALL: [EventKind; 12] = [
        EventKind::IncomingMessage,
        EventKind::ResponseServer,
        EventKind::Level(Severity::Warn),
        EventKind::Level(Severity::Error),
        EventKind::Level(Severity::Fatal),
        EventKind::Level(Severity::Info),
        EventKind::Level(Severity::Trace),
        EventKind::Level(Severity::Debug),
        EventKind::CollectionFound,
        EventKind::CollectionLoaded,
        EventKind::AllCollectionsLoaded,
        EventKind::Forwarding,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            EventKind::IncomingMessage => "incomingMessage",
            EventKind::ResponseServer => "responseServer",
            EventKind::CollectionFound => "collectionFound",
            EventKind::CollectionLoaded => "collectionLoaded",
            EventKind::AllCollectionsLoaded => "allCollectionsLoaded",
            EventKind::Forwarding => "forwarding",
            EventKind::Level(severity) => severity.as_str(),
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
