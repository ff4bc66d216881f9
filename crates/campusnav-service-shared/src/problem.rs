//! RFC 9457 Problem Details for HTTP APIs.
//!
//! Every error response carries `type`, `title`, `status` and a `detail`
//! sentence. Extension members (for example the failed legs of a multi-stop
//! route) are flattened next to the standard fields.
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use campusnav_lib::Error as LibError;

pub const PROBLEM_UNKNOWN_CAMPUS: &str = "/problems/unknown-campus";
pub const PROBLEM_UNKNOWN_NODE: &str = "/problems/unknown-node";
/// Both endpoints exist but nothing connects them.
pub const PROBLEM_ROUTE_NOT_FOUND: &str = "/problems/route-not-found";
/// Some stops of a multi-stop route were unreachable.
pub const PROBLEM_PARTIAL_ROUTE: &str = "/problems/partial-route";
/// The directions or weather provider failed.
pub const PROBLEM_UPSTREAM_FAILURE: &str = "/problems/upstream-failure";
pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";
pub const PROBLEM_SERVICE_UNAVAILABLE: &str = "/problems/service-unavailable";

/// RFC 9457 Problem Details response structure.
///
/// # Example
///
/// ```
/// use campusnav_service_shared::{ProblemDetails, PROBLEM_UNKNOWN_NODE};
/// use axum::http::StatusCode;
///
/// let problem = ProblemDetails::new(PROBLEM_UNKNOWN_NODE, "Unknown Node", StatusCode::NOT_FOUND)
///     .with_detail("Node 'h2_2O9' not found in campus hall. Did you mean: 'h2_209'?")
///     .with_request_id("req-12345");
/// assert_eq!(problem.status, 404);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    pub title: String,

    pub status: u16,

    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Identifies this occurrence; the request ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Always "application/problem+json".
    pub content_type: String,

    /// Problem-type specific members.
    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    pub extensions: Map<String, Value>,
}

impl ProblemDetails {
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
            content_type: "application/problem+json".to_string(),
            extensions: Map::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    /// Attach an extension member. Values that fail to serialize are dropped.
    pub fn with_extension(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.extensions.insert(key.into(), value);
        }
        self
    }

    /// 400 for input that failed validation.
    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_REQUEST,
            "Invalid Request",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    pub fn unknown_campus(
        campus: &str,
        suggestions: &[String],
        request_id: impl Into<String>,
    ) -> Self {
        Self::new(
            PROBLEM_UNKNOWN_CAMPUS,
            "Unknown Campus",
            StatusCode::NOT_FOUND,
        )
        .with_detail(with_suggestions(
            format!("Campus '{}' not found", campus),
            suggestions,
        ))
        .with_request_id(request_id)
    }

    pub fn unknown_node(
        campus: &str,
        node: &str,
        suggestions: &[String],
        request_id: impl Into<String>,
    ) -> Self {
        Self::new(PROBLEM_UNKNOWN_NODE, "Unknown Node", StatusCode::NOT_FOUND)
            .with_detail(with_suggestions(
                format!("Node '{}' not found in campus {}", node, campus),
                suggestions,
            ))
            .with_request_id(request_id)
    }

    pub fn route_not_found(start: &str, goal: &str, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_ROUTE_NOT_FOUND,
            "Route Not Found",
            StatusCode::NOT_FOUND,
        )
        .with_detail(format!("No route exists from '{}' to '{}'", start, goal))
        .with_request_id(request_id)
    }

    /// 502 when a collaborator the request depends on failed.
    pub fn upstream_failure(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_UPSTREAM_FAILURE,
            "Upstream Failure",
            StatusCode::BAD_GATEWAY,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    pub fn internal_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INTERNAL_ERROR,
            "Internal Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    pub fn service_unavailable(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_SERVICE_UNAVAILABLE,
            "Service Unavailable",
            StatusCode::SERVICE_UNAVAILABLE,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }
}

fn with_suggestions(detail: String, suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        return detail;
    }
    let quoted: Vec<String> = suggestions.iter().map(|s| format!("'{}'", s)).collect();
    format!("{}. Did you mean: {}?", detail, quoted.join(", "))
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.title,
            self.detail.as_deref().unwrap_or("")
        )
    }
}

impl std::error::Error for ProblemDetails {}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = Json(&self).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );
        *response.status_mut() = status;
        response
    }
}

/// Convert library errors to ProblemDetails.
///
/// The `request_id` must be provided separately since library errors don't have it.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ProblemDetails {
    match error {
        LibError::CampusNotFound {
            campus,
            suggestions,
        } => ProblemDetails::unknown_campus(campus, suggestions, request_id),
        LibError::NodeNotFound {
            campus,
            node,
            suggestions,
        } => ProblemDetails::unknown_node(campus, node, suggestions, request_id),
        LibError::NoPathFound { start, goal }
        | LibError::NoValidIntegratedPath { start, goal } => {
            ProblemDetails::route_not_found(start, goal, request_id)
        }
        LibError::PartialMultiDestinationFailure {
            failed,
            total_legs,
            accumulated_distance,
        } => ProblemDetails::new(
            PROBLEM_PARTIAL_ROUTE,
            "Partial Route",
            StatusCode::UNPROCESSABLE_ENTITY,
        )
        .with_detail(error.to_string())
        .with_request_id(request_id)
        .with_extension("failed_legs", failed)
        .with_extension("total_legs", total_legs)
        .with_extension("accumulated_distance", accumulated_distance),
        LibError::CollaboratorFailure { .. } | LibError::Http(_) => {
            ProblemDetails::upstream_failure(error.to_string(), request_id)
        }
        LibError::DataDirNotFound { path } => ProblemDetails::service_unavailable(
            format!("Campus data not available at {}", path.display()),
            request_id,
        ),
        _ => ProblemDetails::internal_error(error.to_string(), request_id),
    }
}

/// Short label for the failure class of `error`, used on metrics.
pub fn failure_reason(error: &LibError) -> &'static str {
    match error {
        LibError::CampusNotFound { .. } => "unknown_campus",
        LibError::NodeNotFound { .. } => "unknown_node",
        LibError::NoPathFound { .. } | LibError::NoValidIntegratedPath { .. } => "no_path",
        LibError::PartialMultiDestinationFailure { .. } => "partial_route",
        LibError::CollaboratorFailure { .. } | LibError::Http(_) => "upstream",
        _ => "internal_error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusnav_lib::LegFailure;

    #[test]
    fn test_problem_details_new() {
        let problem = ProblemDetails::new(
            PROBLEM_UNKNOWN_CAMPUS,
            "Unknown Campus",
            StatusCode::NOT_FOUND,
        );
        assert_eq!(problem.type_uri, PROBLEM_UNKNOWN_CAMPUS);
        assert_eq!(problem.status, 404);
        assert_eq!(problem.content_type, "application/problem+json");
        assert!(problem.extensions.is_empty());
    }

    #[test]
    fn test_problem_details_bad_request() {
        let problem = ProblemDetails::bad_request("Invalid JSON", "req-123");
        assert_eq!(problem.status, 400);
        assert_eq!(problem.instance.as_deref(), Some("req-123"));
    }

    #[test]
    fn test_unknown_node_lists_suggestions() {
        let suggestions = vec!["h2_209".to_string(), "h2_290".to_string()];
        let problem = ProblemDetails::unknown_node("hall", "h2_2O9", &suggestions, "req-456");
        let detail = problem.detail.as_deref().unwrap();
        assert!(detail.contains("'h2_2O9' not found in campus hall"));
        assert!(detail.contains("Did you mean: 'h2_209', 'h2_290'?"));
    }

    #[test]
    fn test_unknown_campus_without_suggestions() {
        let problem = ProblemDetails::unknown_campus("ev", &[], "req-789");
        assert!(!problem.detail.as_deref().unwrap().contains("Did you mean"));
    }

    #[test]
    fn test_problem_details_serialization() {
        let problem =
            ProblemDetails::bad_request("Test error", "req-test").with_extension("field", "k");
        let json = serde_json::to_string(&problem).unwrap();

        assert!(json.contains("\"type\":\"/problems/invalid-request\""));
        assert!(json.contains("\"status\":400"));
        assert!(json.contains("\"instance\":\"req-test\""));
        assert!(json.contains("\"field\":\"k\""));
        assert!(!json.contains("extensions"));
    }

    #[test]
    fn test_from_lib_error_node_not_found() {
        let error = LibError::NodeNotFound {
            campus: "hall".to_string(),
            node: "h2_999".to_string(),
            suggestions: Vec::new(),
        };
        let problem = from_lib_error(&error, "req-lib");
        assert_eq!(problem.type_uri, PROBLEM_UNKNOWN_NODE);
        assert_eq!(problem.status, 404);
        assert_eq!(failure_reason(&error), "unknown_node");
    }

    #[test]
    fn test_from_lib_error_no_integrated_path() {
        let error = LibError::NoValidIntegratedPath {
            start: "hall:h2_209".to_string(),
            goal: "mb:mb1_101".to_string(),
        };
        let problem = from_lib_error(&error, "req-route");
        assert_eq!(problem.type_uri, PROBLEM_ROUTE_NOT_FOUND);
        assert!(problem.detail.as_deref().unwrap().contains("hall:h2_209"));
        assert_eq!(failure_reason(&error), "no_path");
    }

    #[test]
    fn test_from_lib_error_partial_route_carries_legs() {
        let error = LibError::PartialMultiDestinationFailure {
            failed: vec![LegFailure {
                destination: "h2_999".to_string(),
                error: "unknown node".to_string(),
            }],
            total_legs: 3,
            accumulated_distance: 42.5,
        };
        let problem = from_lib_error(&error, "req-partial");
        assert_eq!(problem.status, 422);
        assert_eq!(problem.extensions["total_legs"], 3);
        assert_eq!(problem.extensions["accumulated_distance"], 42.5);
        assert_eq!(
            problem.extensions["failed_legs"][0]["destination"],
            "h2_999"
        );
    }

    #[test]
    fn test_from_lib_error_collaborator_is_bad_gateway() {
        let error = LibError::CollaboratorFailure {
            provider: "weather",
            message: "timeout".to_string(),
        };
        let problem = from_lib_error(&error, "req-up");
        assert_eq!(problem.status, 502);
        assert_eq!(failure_reason(&error), "upstream");
    }
}
