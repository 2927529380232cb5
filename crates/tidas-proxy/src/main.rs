//! # tidas-proxy — Binary Entry Point
//!
//! Starts the Axum HTTP server for the Tidas identity proxy.
//! Binds to configurable port (default 8080).

use tidas_client::TidasConfig;
use tidas_proxy::state::{AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Build configuration from environment.
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let auth_token = std::env::var("AUTH_TOKEN").ok().filter(|t| !t.is_empty());
    let config = AppConfig { port, auth_token };

    let state = AppState::with_config(config);

    // Attempt to configure the Tidas client from environment. A missing key
    // is not fatal: the server starts and identity endpoints report 503
    // until configuration arrives.
    match TidasConfig::from_env() {
        Ok(tidas_config) => {
            let server = tidas_config.server.clone();
            state.configure(tidas_config).map_err(|e| {
                tracing::error!("Failed to create Tidas client: {e}");
                e
            })?;
            tracing::info!(server = %server, "Tidas client configured");
        }
        Err(e) => {
            tracing::warn!("Tidas client not configured: {e}. Identity endpoints will return 503.");
        }
    }

    let app = tidas_proxy::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Tidas proxy listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
