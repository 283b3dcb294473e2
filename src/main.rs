//! Image Compression Service
//!
//! Accepts base64 data URLs over HTTP and returns them compressed by a
//! remote compression backend.

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use image_compressor::api::rest::{AppState, create_rest_router};
use image_compressor::backend::ResmushClient;
use image_compressor::config::Config;
use image_compressor::service::CompressionService;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    info!("Starting Image Compression Service v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_path = Config::default_path();
    let config = Config::load(&config_path).unwrap_or_else(|e| {
        info!("Using default config ({}: {})", config_path, e);
        Config::default()
    });

    info!("Configuration loaded:");
    info!("  Listen address: {}", config.server.bind_addr());
    info!("  Backend: {} (qlty={})", config.backend.endpoint, config.backend.quality);
    info!("  Request timeout: {:?}", config.backend.request_timeout());
    info!("  Max body: {} bytes", config.server.max_body_bytes);

    // Compression backend client, shared by every request
    let client = Arc::new(ResmushClient::new(&config.backend)?);
    info!("Compression backend client ready for {}", client.endpoint());

    let service = Arc::new(CompressionService::new(client));
    let app_state = Arc::new(AppState { service });
    let router = create_rest_router(app_state, config.server.max_body_bytes);

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("REST API listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Goodbye!");
    Ok(())
}

/// Wait for Ctrl+C
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received, draining connections...");
    }
}
