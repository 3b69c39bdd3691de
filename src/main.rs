//! event-logger
//!
//! Runs a small HTTP echo service whose traffic is logged through the event
//! dispatcher.
//!
//! ```text
//!   client ──▶ http::server ──publish──▶ InMemoryEventBus ──▶ Dispatcher
//!                                                              │
//!                          request / response / system ◀───────┘
//!                                   channels
//!                                      │
//!                               TracingSink ──▶ stdout
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use event_logger::config::{load_config, LoggerConfig};
use event_logger::dispatch::{Dispatcher, Locator, EVENTS};
use event_logger::events::{EventBus, InMemoryEventBus, SystemClock};
use event_logger::http::HttpServer;
use event_logger::lifecycle::{FatalError, FatalGuard, PanicRuntime};
use event_logger::logging::TracingSink;
use event_logger::observability;

#[derive(Parser)]
#[command(name = "event-logger")]
#[command(about = "HTTP echo service logged through the event dispatcher", long_about = None)]
struct Cli {
    /// TOML configuration file (levels and sink settings).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on.
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    bind: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => LoggerConfig::default(),
    };
    observability::logging::init(&config);

    let bus: Arc<dyn EventBus> = Arc::new(InMemoryEventBus::new());
    let locator = Locator::new();
    locator.register_instance(EVENTS, Arc::clone(&bus));

    let logger = Dispatcher::register(&locator, &config, Arc::new(TracingSink))?;
    let guard = FatalGuard::install(&PanicRuntime, Arc::clone(&logger));

    let listener = TcpListener::bind(&cli.bind).await?;
    bus.publish("info", format!("Listening on {}", listener.local_addr()?));

    let server = HttpServer::new(Arc::clone(&bus), Arc::new(SystemClock));
    if let Err(e) = server.run(listener, shutdown_signal()).await {
        guard.handle(&FatalError::from_error(&e));
        return Err(e.into());
    }

    logger.info("Shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
