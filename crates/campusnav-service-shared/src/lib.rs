//! Shared infrastructure for the CampusNav HTTP service.
//!
//! - [`AppState`]: campus graphs and collaborators loaded once at startup
//! - [`health`](health_live): liveness and readiness probes
//! - [`ProblemDetails`]: RFC 9457 error bodies, built from library errors by
//!   [`from_lib_error`]
//! - [`ServiceResponse`]: success envelope
//! - [`metrics`], [`logging`], [`middleware`]: observability plumbing
//! - request bodies with [`Validate`]
//!
//! Handlers stay thin; routing itself lives in `campusnav-lib`:
//!
//! ```text
//! request JSON -> Validate -> campusnav-lib (blocking pool) -> ServiceResponse | ProblemDetails
//! ```
//!
//! Enable the `test-utils` feature for [`test_utils`] in dependent crates.

#![deny(warnings)]

mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_integrated_choice, record_path_nodes,
    record_route_calculated, record_route_distance, record_route_failed, MetricsConfig,
    MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId, REQUEST_ID_HEADER};
pub use problem::{
    failure_reason, from_lib_error, ProblemDetails, PROBLEM_INTERNAL_ERROR,
    PROBLEM_INVALID_REQUEST, PROBLEM_PARTIAL_ROUTE, PROBLEM_ROUTE_NOT_FOUND,
    PROBLEM_SERVICE_UNAVAILABLE, PROBLEM_UNKNOWN_CAMPUS, PROBLEM_UNKNOWN_NODE,
    PROBLEM_UPSTREAM_FAILURE,
};
pub use request::{
    IntegratedRequest, KPathsRequest, PathRequest, RouteThroughRequest, Validate, WeatherQuery,
    WeatherTarget, MAX_K_PATHS, MAX_STOPS,
};
pub use response::ServiceResponse;
pub use state::{AppState, AppStateError};
