//! Wire payloads of the predefined events.
//!
//! Payloads travel on the bus as `serde_json::Value`. The field names below
//! (`requestId`, `method`, `url`, `remoteAddr`, `startTime`, `response`,
//! `request`, `name`) are what existing producers send and must not change.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request as seen by `incomingMessage` and inside `responseServer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestInfo {
    pub request_id: String,
    pub method: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_addr: Option<String>,
    /// Epoch milliseconds at which the request was received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<u64>,
}

impl RequestInfo {
    pub fn new(
        request_id: impl Into<String>,
        method: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            method: method.into(),
            url: url.into(),
            remote_addr: None,
            start_time: None,
        }
    }

    pub fn with_remote_addr(mut self, remote_addr: impl Into<String>) -> Self {
        self.remote_addr = Some(remote_addr.into());
        self
    }

    pub fn started_at(mut self, millis: u64) -> Self {
        self.start_time = Some(millis);
        self
    }
}

/// Wire form of a payload, built from its serde derive.
///
/// These structs hold only strings, numbers and JSON values under string
/// keys, so serialization cannot fail.
fn to_wire<T: Serialize>(payload: &T) -> Value {
    serde_json::to_value(payload).unwrap_or(Value::Null)
}

impl From<&RequestInfo> for Value {
    fn from(request: &RequestInfo) -> Self {
        to_wire(request)
    }
}

impl From<RequestInfo> for Value {
    fn from(request: RequestInfo) -> Self {
        to_wire(&request)
    }
}

/// Payload of `responseServer`: the response summary plus the originating request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseServer {
    /// Rendered verbatim when a string, as JSON otherwise (e.g. `200`).
    pub response: Value,
    pub request: RequestInfo,
}

impl ResponseServer {
    pub fn new(response: impl Into<Value>, request: RequestInfo) -> Self {
        Self {
            response: response.into(),
            request,
        }
    }
}

impl From<ResponseServer> for Value {
    fn from(event: ResponseServer) -> Self {
        to_wire(&event)
    }
}

/// Payload of `collectionFound` and `collectionLoaded`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDescriptor {
    pub name: String,
}

impl CollectionDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl From<CollectionDescriptor> for Value {
    fn from(descriptor: CollectionDescriptor) -> Self {
        to_wire(&descriptor)
    }
}

/// Render a passthrough value: strings verbatim, anything else as JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
