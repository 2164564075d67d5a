//! Crowdask server entry point.
//!
//! Startup sequence:
//!
//! 1. Install the tracing subscriber (`RUST_LOG` controls verbosity)
//! 2. Load configuration from environment (`CROWDASK_*`)
//! 3. Build the hub with the configured moderator secret
//! 4. Serve HTTP + WebSocket until ctrl-c

use std::sync::Arc;

use anyhow::{Context, Result};
use crowdask_hub::{Hub, ModeratorAuth};
use crowdask_server::{build_router, ServerConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env().context("invalid configuration")?;

    let auth = match &config.moderator_secret {
        Some(secret) => ModeratorAuth::new(secret.clone()),
        None => {
            warn!("No moderator secret configured; moderation commands will be rejected");
            ModeratorAuth::disabled()
        }
    };

    let hub = Arc::new(Hub::new(auth));
    let router = build_router(Arc::clone(&hub), &config);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Crowdask server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Crowdask server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "Failed to listen for shutdown signal");
    }
}
