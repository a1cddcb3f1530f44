//! kartei-server - REST API server binary.

use std::net::SocketAddr;

use anyhow::Context;
use kartei_core::config::KarteiConfig;
use kartei_server::{create_server, AppState};
use tokio::signal;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Config file from `KARTEI_CONFIG` if set, then environment overrides.
fn load_config() -> anyhow::Result<KarteiConfig> {
    match std::env::var("KARTEI_CONFIG") {
        Ok(path) => KarteiConfig::from_file(&path)
            .with_context(|| format!("failed to load config file '{}'", path))?
            .merge_env()
            .context("invalid KARTEI_* environment"),
        Err(_) => KarteiConfig::from_env().context("invalid KARTEI_* environment"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive(Level::INFO.into())
                .add_directive("kartei_server=debug".parse()?),
        )
        .init();

    // Get configuration from environment
    let host = std::env::var("KARTEI_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("KARTEI_PORT")
        .unwrap_or_else(|_| "8000".to_string())
        .parse()
        .context("KARTEI_PORT must be a valid port number")?;

    let config = load_config()?;
    let state = AppState::from_config(&config)?;
    let app = create_server(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting kartei-server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            info!("Shutdown signal received");
        })
        .await?;

    info!("Server stopped cleanly");
    Ok(())
}
