//! Liveness and readiness probes.
//!
//! `/health/live` answers as long as the process runs; `/health/ready`
//! additionally requires at least one campus graph in memory.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Body of both probe responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// "ok", or "not_ready: <reason>".
    pub status: String,

    pub service: String,

    pub version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub campuses_loaded: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes_loaded: Option<usize>,

    /// RFC 3339 timestamp of when the campus data was loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<String>,

    /// Whether a live weather provider is wired in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_weather: Option<bool>,
}

impl HealthStatus {
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            campuses_loaded: None,
            nodes_loaded: None,
            loaded_at: None,
            live_weather: None,
        }
    }

    /// Ready status populated from the loaded state.
    pub fn ready(service: &str, version: &str, state: &AppState) -> Self {
        Self {
            campuses_loaded: Some(state.store().len()),
            nodes_loaded: Some(state.store().total_nodes()),
            loaded_at: Some(state.loaded_at().to_rfc3339()),
            live_weather: Some(state.weather().is_some()),
            ..Self::alive(service, version)
        }
    }

    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {}", reason),
            ..Self::alive(service, version)
        }
    }
}

/// Liveness probe handler.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"campusnav-service-shared","version":"0.1.0"}
/// ```
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler; 503 while no campus graph is loaded.
///
/// ```text
/// GET /health/ready
/// {"status":"ok",...,"campuses_loaded":2,"nodes_loaded":39,"loaded_at":"...","live_weather":true}
/// ```
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    if state.store().is_empty() {
        let status = HealthStatus::not_ready(service, version, "no campus graphs loaded");
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response();
    }

    let status = HealthStatus::ready(service, version, &state);
    (StatusCode::OK, Json(status)).into_response()
}
