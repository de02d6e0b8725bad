use anyhow::{Context, Result};
use hearth::api::{create_ws_router, WsAppState};
use hearth::command::JsonCommands;
use hearth::config::{load_config, HearthConfig};
use hearth::state::HomeEngine;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hearth=info".into()),
        )
        .init();

    info!("Hearth starting...");

    let config_path =
        std::env::var("HEARTH_CONFIG").unwrap_or_else(|_| "hearth.toml".to_string());
    let mut config = if std::path::Path::new(&config_path).exists() {
        let config = load_config(&config_path)
            .map_err(|e| anyhow::anyhow!("{}", e))
            .context("Failed to load configuration")?;
        info!(path = %config_path, "Configuration loaded");
        config
    } else {
        info!("No configuration file, using defaults");
        HearthConfig::default()
    };
    config.apply_env_overrides();

    let engine = Arc::new(HomeEngine::new(&config));
    let state = Arc::new(WsAppState {
        engine,
        source: Arc::new(JsonCommands),
        tick_interval: Duration::from_secs(config.simulation.tick_interval_seconds),
    });
    let router = create_ws_router(state);

    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind server port")?;
    info!(addr = %addr, "Hearth listening");

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "Server error");
        }
    });

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl_c signal")?;
    info!("Shutdown signal received");

    server_handle.abort();
    info!("Hearth stopped");

    Ok(())
}
