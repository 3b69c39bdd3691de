//! HTTP host that reports its traffic on the event bus.
//!
//! # Responsibilities
//! - Serve a small echo application
//! - Publish `incomingMessage` when a request arrives
//! - Publish `responseServer` (summary = status code) when it completes
//! - Echo the request ID back in `x-request-id`

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::{HeaderValue, Method, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::events::bus::EventBus;
use crate::events::clock::Clock;
use crate::events::kind::EventKind;
use crate::events::payload::ResponseServer;
use crate::http::request::{request_id, request_info, X_REQUEST_ID};

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub bus: Arc<dyn EventBus>,
    pub clock: Arc<dyn Clock>,
}

/// HTTP server publishing request and response events.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(bus: Arc<dyn EventBus>, clock: Arc<dyn Clock>) -> Self {
        let router = Self::build_router(AppState { bus, clock });
        Self { router }
    }

    /// Build the Axum router with the event middleware.
    pub fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/status/{code}", any(status_handler))
            .route("/{*path}", any(echo_handler))
            .route("/", any(echo_handler))
            .layer(middleware::from_fn_with_state(state.clone(), publish_events))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// The router, for in-process use (e.g. `tower::ServiceExt::oneshot`).
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn publish_events(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let id = request_id(&request);
    let info = request_info(&request, id.clone(), state.clock.now_millis());
    state.bus.publish(EventKind::IncomingMessage.name(), &info);

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    state.bus.publish(
        EventKind::ResponseServer.name(),
        ResponseServer::new(response.status().as_u16(), info),
    );
    response
}

async fn echo_handler(method: Method, uri: Uri) -> String {
    format!("{method} {uri}\n")
}

async fn status_handler(Path(code): Path<u16>) -> Response {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, format!("{status}\n")).into_response(),
        Err(_) => (StatusCode::BAD_REQUEST, "invalid status code\n").into_response(),
    }
}
