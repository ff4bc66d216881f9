//! `campusnav-service-route` binary.
//!
//! # Configuration
//!
//! - `CAMPUSNAV_DATA_DIR` - campus data directory (default: platform data dir)
//! - `CAMPUSNAV_EAGER_ACCESSIBILITY` - build accessibility subgraphs at startup
//! - `CAMPUSNAV_*` routing overrides, see `RoutingConfig::from_env`
//! - `GOOGLE_MAPS_API_KEY` - enables outdoor legs
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `METRICS_ENABLED`, `METRICS_PATH` - Prometheus endpoint
//! - `RUST_LOG`, `LOG_FORMAT`, `SERVICE_NAME` - logging

use std::env;
use std::net::SocketAddr;

use tracing::{error, info, warn};

use campusnav_lib::{resolve_data_dir, RoutingConfig};
use campusnav_service_route::app;
use campusnav_service_shared::{
    init_logging, init_metrics, AppState, LoggingConfig, MetricsConfig,
};

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LoggingConfig::from_env().with_service("campusnav-route"));

    let metrics_config = MetricsConfig::from_env();
    let metrics_path = match init_metrics(&metrics_config) {
        Ok(()) => Some(metrics_config.path.clone()),
        Err(e) => {
            warn!(error = %e, "continuing without metrics");
            None
        }
    };

    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let config = RoutingConfig::from_env()?;
    let data_dir = resolve_data_dir(None)?;
    let eager = env_flag("CAMPUSNAV_EAGER_ACCESSIBILITY");

    info!(data_dir = %data_dir.display(), port, eager_accessibility = eager, "starting route service");

    let state = tokio::task::spawn_blocking(move || AppState::load(&data_dir, config, eager))
        .await?
        .inspect_err(|e| error!(error = %e, "failed to load application state"))?;

    info!(
        campuses = state.store().len(),
        nodes = state.store().total_nodes(),
        live_weather = state.weather().is_some(),
        "application state loaded"
    );

    let router = app(state, metrics_path.as_deref());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for shutdown signal");
            }
            info!("shutting down");
        })
        .await?;

    Ok(())
}
