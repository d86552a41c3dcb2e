//! cryptotrack server entry point.
//!
//! Boots the market-data HTTP API. Logging goes to stderr as JSON.

use anyhow::{Context, Result};
use cryptotrack_client::MarketService;
use cryptotrack_core::{AppConfig, TtlCache};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod sweeper;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let cache = Arc::new(TtlCache::with_max_entries(config.cache_max_entries));
    let market = MarketService::from_config(&config, cache.clone())?;
    let sweeper = sweeper::spawn(cache, config.cache_sweep_interval(), config.cache_max_age());

    let app = handler::router(handler::AppState { market: Arc::new(market) }, &config);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %config.bind_addr,
        upstream = %config.upstream_base_url,
        "Starting cryptotrack server"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    tracing::info!("cryptotrack server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
