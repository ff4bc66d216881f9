//! CampusNav routing HTTP service.
//!
//! # Endpoints
//!
//! - `POST /api/v1/path` - shortest indoor path within one campus
//! - `POST /api/v1/k-paths` - up to `k` alternative indoor paths
//! - `POST /api/v1/route-through` - ordered multi-stop indoor route
//! - `POST /api/v1/integrated` - indoor/outdoor/tunnel route across campuses
//! - `GET /api/v1/weather` - current conditions at a point or campus
//! - `GET /api/v1/campuses` - loaded campuses and tunnel connectors
//! - `GET /health/live`, `GET /health/ready` - probes
//! - `GET /metrics` (configurable) - Prometheus exposition
//!
//! Errors are RFC 9457 problem documents; every response carries
//! `X-Request-ID`.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use campusnav_service_shared::{health_live, health_ready, metrics_handler, AppState, MetricsLayer};

pub mod handlers;

/// Build the service router. `metrics_path` mounts the Prometheus endpoint.
pub fn app(state: AppState, metrics_path: Option<&str>) -> Router {
    let api = Router::new()
        .route("/api/v1/path", post(handlers::path_handler))
        .route("/api/v1/k-paths", post(handlers::k_paths_handler))
        .route("/api/v1/route-through", post(handlers::route_through_handler))
        .route("/api/v1/integrated", post(handlers::integrated_handler))
        .route("/api/v1/weather", get(handlers::weather_handler))
        .route("/api/v1/campuses", get(handlers::campuses_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready));

    let api = match metrics_path {
        Some(path) => api.route(path, get(metrics_handler)),
        None => api,
    };

    api.layer(CorsLayer::permissive())
        .layer(MetricsLayer)
        .with_state(state)
}
