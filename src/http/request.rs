//! Request identification.
//!
//! # Responsibilities
//! - Reuse a client-supplied `x-request-id` or mint a UUID v4
//! - Capture the request fields logged by `incomingMessage` / `responseServer`

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request};
use uuid::Uuid;

use crate::events::payload::RequestInfo;

/// Header carrying the request ID in both directions.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID from the incoming header, or a fresh UUID.
pub fn request_id(request: &Request) -> String {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Event payload describing `request`, stamped with `start_millis`.
pub fn request_info(request: &Request, request_id: String, start_millis: u64) -> RequestInfo {
    let mut info = RequestInfo::new(
        request_id,
        request.method().as_str(),
        request.uri().to_string(),
    )
    .started_at(start_millis);

    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        info = info.with_remote_addr(addr.ip().to_string());
    }
    info
}
