//! Binary crate for the `weather-server` backend.

use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use dashboard_core::ServerConfig;
use dashboard_server::{AppState, router};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Weather dashboard backend")]
struct Args {
    /// Port to listen on; overrides PORT and the config file.
    #[arg(long)]
    port: Option<u16>,

    /// Path to a TOML config file instead of the platform default.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServerConfig::load_from(path)?,
        None => ServerConfig::load()?,
    };
    if let Some(port) = args.port {
        config.port = port;
    }

    let state = AppState::from_config(&config)?;
    let app = router(state, &config.frontend_url)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(%addr, environment = ?config.environment, "weather dashboard backend listening");
    info!(origin = %config.frontend_url, "CORS enabled");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("backend stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
