use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use shopee_bridge::server::{self, AppState};
use shopee_bridge::BridgeConfig;

const DEFAULT_PORT: u16 = 5000;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shopee_bridge=info,tower_http=info".into()),
        )
        .init();

    let config = match BridgeConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            tracing::error!("Set SHOPEE_PARTNER_ID and SHOPEE_PARTNER_KEY before starting");
            std::process::exit(1);
        }
    };

    let port = match std::env::var("PORT") {
        Ok(value) => value
            .trim()
            .parse::<u16>()
            .with_context(|| format!("PORT must be a port number, got '{value}'"))?,
        Err(_) => DEFAULT_PORT,
    };

    let base_url: &str = config.base_url().as_ref();
    info!("shopee-bridge v{}", env!("CARGO_PKG_VERSION"));
    info!(
        partner_id = %config.partner_id(),
        base_url,
        "Partner configuration loaded"
    );
    if config.redirect_uri().is_none() {
        tracing::warn!("SHOPEE_REDIRECT_URI is not set; /auth/login will fail");
    }

    let state = Arc::new(AppState::new(config).context("failed to build HTTP client")?);
    let app = server::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
    info!("Shutting down");
}
