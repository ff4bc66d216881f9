//! Prometheus metrics for the routing service.
//!
//! HTTP request metrics are recorded by [`crate::MetricsLayer`]; the helpers
//! below record the routing outcomes themselves.
//!
//! ```no_run
//! use campusnav_service_shared::metrics::{init_metrics, metrics_handler, MetricsConfig};
//! use axum::{routing::get, Router};
//!
//! init_metrics(&MetricsConfig::default()).expect("failed to initialize metrics");
//! let app: Router = Router::new().route("/metrics", get(metrics_handler));
//! ```

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Where the exposition endpoint is mounted.
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// Read `METRICS_ENABLED` (anything but "false" enables) and `METRICS_PATH`.
    pub fn from_env() -> Self {
        let enabled = std::env::var("METRICS_ENABLED")
            .map(|v| !v.eq_ignore_ascii_case("false"))
            .unwrap_or(true);
        let path = std::env::var("METRICS_PATH")
            .ok()
            .filter(|p| p.starts_with('/'))
            .unwrap_or_else(|| "/metrics".to_string());

        Self { enabled, path }
    }
}

/// Install the Prometheus recorder. Only the first successful call wins.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }
    if PROMETHEUS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)
}

pub fn prometheus_handle() -> Option<&'static PrometheusHandle> {
    PROMETHEUS_HANDLE.get()
}

/// Prometheus exposition text, or a comment line before [`init_metrics`].
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

#[derive(Debug, Clone)]
pub enum MetricsError {
    Disabled,
    AlreadyInitialized,
    InstallFailed(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::Disabled => write!(f, "metrics are disabled"),
            MetricsError::AlreadyInitialized => write!(f, "metrics recorder already initialized"),
            MetricsError::InstallFailed(e) => {
                write!(f, "failed to install metrics recorder: {}", e)
            }
        }
    }
}

impl std::error::Error for MetricsError {}

// =============================================================================
// Routing metrics
// =============================================================================

/// Count a successful route of the given kind
/// (`path`, `k_paths`, `route_through`, `integrated`).
pub fn record_route_calculated(kind: &str, service: &str) {
    metrics::counter!(
        "campusnav_routes_calculated_total",
        "kind" => kind.to_string(),
        "service" => service.to_string()
    )
    .increment(1);
}

/// Count a failed route; `reason` comes from [`crate::failure_reason`]
/// or is `validation_error`.
pub fn record_route_failed(reason: &str, service: &str) {
    metrics::counter!(
        "campusnav_routes_failed_total",
        "reason" => reason.to_string(),
        "service" => service.to_string()
    )
    .increment(1);
}

/// Number of graph nodes on a returned path.
pub fn record_path_nodes(nodes: usize, kind: &str) {
    metrics::histogram!(
        "campusnav_path_nodes",
        "kind" => kind.to_string()
    )
    .record(nodes as f64);
}

/// Total distance in metres of a returned route.
pub fn record_route_distance(metres: f64, kind: &str) {
    metrics::histogram!(
        "campusnav_route_distance_meters",
        "kind" => kind.to_string()
    )
    .record(metres);
}

/// Which way an integrated route went and whether weather changed the choice.
pub fn record_integrated_choice(uses_tunnel: bool, weather_adjusted: bool) {
    metrics::counter!(
        "campusnav_integrated_routes_total",
        "via" => if uses_tunnel { "tunnel" } else { "surface" },
        "weather_adjusted" => weather_adjusted.to_string()
    )
    .increment(1);
}
