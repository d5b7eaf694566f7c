//! Tickpulse API Server
//!
//! HTTP API server with health check, metrics, and evaluation endpoints.
//! This service is stateless and can be horizontally scaled.

use dotenvy::dotenv;
use tickpulse::core::http::start_server;
use tickpulse::logging;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    // Initialize logging based on environment
    logging::init_logging();

    let port = tickpulse::config::get_http_port();

    let env = tickpulse::config::get_environment();
    info!("Starting Tickpulse API Server");
    info!(environment = %env, "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);
    info!("This service is stateless and can be horizontally scaled");

    // Start HTTP server
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port).await {
            error!(error = %e, "HTTP server error");
        }
    });

    // Graceful shutdown
    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
            info!("API server stopped");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
