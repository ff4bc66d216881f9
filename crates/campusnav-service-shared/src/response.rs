//! Success response envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Payload fields at the top level plus a `content_type` member, mirroring
/// [`crate::ProblemDetails`] on the error side.
///
/// ```
/// use campusnav_service_shared::ServiceResponse;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Leg {
///     path: Vec<String>,
///     distance: f64,
/// }
///
/// let body = ServiceResponse::new(Leg { path: vec!["h2_209".into()], distance: 0.0 });
/// assert_eq!(body.content_type, "application/json");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    #[serde(flatten)]
    pub data: T,

    pub content_type: String,

    /// Not serialized; 200 unless overridden.
    #[serde(skip, default = "ok_status")]
    status: u16,
}

fn ok_status() -> u16 {
    StatusCode::OK.as_u16()
}

impl<T> ServiceResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            content_type: "application/json".to_string(),
            status: ok_status(),
        }
    }

    /// Respond with `status` instead of 200.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status.as_u16();
        self
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK)
    }
}

impl<T> From<T> for ServiceResponse<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Leg {
        path: Vec<String>,
        distance: f64,
    }

    fn leg() -> Leg {
        Leg {
            path: vec!["h2_209".to_string(), "h2_260".to_string()],
            distance: 30.0,
        }
    }

    #[test]
    fn test_response_flattens_payload() {
        let json = serde_json::to_string(&ServiceResponse::new(leg())).unwrap();
        assert!(json.contains("\"distance\":30.0"));
        assert!(json.contains("\"content_type\":\"application/json\""));
        assert!(!json.contains("\"data\""));
        assert!(!json.contains("\"status\""));
    }

    #[test]
    fn test_response_from_trait() {
        let response: ServiceResponse<Leg> = leg().into();
        assert_eq!(response.data, leg());
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_response_with_status() {
        let response = ServiceResponse::new(leg()).with_status(StatusCode::ACCEPTED);
        assert_eq!(response.into_response().status(), StatusCode::ACCEPTED);
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{"path":["a"],"distance":1.5,"content_type":"application/json"}"#;
        let response: ServiceResponse<Leg> = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.distance, 1.5);
        assert_eq!(response.status(), StatusCode::OK);
    }
}
