//! Outdoor directions boundary.
//!
//! Street-level routing is delegated to an external provider through the
//! [`OutdoorDirections`] trait. [`GoogleDirectionsClient`] is the production
//! implementation.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::client::build_client;
use crate::error::{Error, Result};
use crate::geo::{decode_polyline, LatLng};

const DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";
const PROVIDER: &str = "outdoor directions";

/// Environment variable holding the Google Maps API key.
pub const GOOGLE_MAPS_API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

/// Travel mode requested from the outdoor provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Walking,
    Bicycling,
    Transit,
    Driving,
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Transit => "transit",
            TravelMode::Driving => "driving",
        };
        f.write_str(value)
    }
}

impl FromStr for TravelMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "walking" => Ok(TravelMode::Walking),
            "bicycling" => Ok(TravelMode::Bicycling),
            "transit" => Ok(TravelMode::Transit),
            "driving" => Ok(TravelMode::Driving),
            other => Err(format!("unknown travel mode '{other}'")),
        }
    }
}

/// One instruction of an outdoor route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutdoorStep {
    /// Plain-text instruction.
    pub instruction: String,
    /// Metres.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
}

/// A street-level route returned by the outdoor provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutdoorRoute {
    pub mode: TravelMode,
    /// Metres.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
    pub steps: Vec<OutdoorStep>,
    pub coordinates: Vec<LatLng>,
}

/// Source of outdoor routes between two coordinates.
pub trait OutdoorDirections: Send + Sync {
    /// The provider's preferred route from `origin` to `destination`.
    fn find_outdoor_path(
        &self,
        origin: LatLng,
        destination: LatLng,
        mode: TravelMode,
    ) -> Result<OutdoorRoute>;
}

/// Provider that rejects every request. Stands in for the real client when
/// no API key is configured, so indoor and tunnel routing keep working.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredDirections;

impl OutdoorDirections for UnconfiguredDirections {
    fn find_outdoor_path(
        &self,
        _origin: LatLng,
        _destination: LatLng,
        _mode: TravelMode,
    ) -> Result<OutdoorRoute> {
        Err(Error::collaborator(
            PROVIDER,
            format!("{GOOGLE_MAPS_API_KEY_ENV} is not set"),
        ))
    }
}

/// [`GoogleDirectionsClient::from_env`], falling back to
/// [`UnconfiguredDirections`] with a warning.
pub fn directions_from_env() -> Arc<dyn OutdoorDirections> {
    match GoogleDirectionsClient::from_env() {
        Ok(client) => Arc::new(client),
        Err(err) => {
            warn!(error = %err, "outdoor directions unavailable; street legs will fail");
            Arc::new(UnconfiguredDirections)
        }
    }
}

/// [`OutdoorDirections`] backed by the Google Directions API.
#[derive(Clone)]
pub struct GoogleDirectionsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for GoogleDirectionsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleDirectionsClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GoogleDirectionsClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            api_key: api_key.into(),
            base_url: DIRECTIONS_URL.to_string(),
        })
    }

    /// Build a client from [`GOOGLE_MAPS_API_KEY_ENV`].
    pub fn from_env() -> Result<Self> {
        let key = env::var(GOOGLE_MAPS_API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                Error::collaborator(PROVIDER, format!("{GOOGLE_MAPS_API_KEY_ENV} is not set"))
            })?;
        Self::new(key)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl OutdoorDirections for GoogleDirectionsClient {
    fn find_outdoor_path(
        &self,
        origin: LatLng,
        destination: LatLng,
        mode: TravelMode,
    ) -> Result<OutdoorRoute> {
        debug!(%origin, %destination, %mode, "requesting outdoor directions");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("origin", origin.to_string()),
                ("destination", destination.to_string()),
                ("mode", mode.to_string()),
                ("alternatives", "true".to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .map_err(|err| Error::collaborator(PROVIDER, err.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::collaborator(PROVIDER, format!("HTTP {status}")));
        }
        let body = response
            .text()
            .map_err(|err| Error::collaborator(PROVIDER, err.without_url().to_string()))?;
        parse_directions(&body, mode)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::collaborator(PROVIDER, "no routes returned"))
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
struct RawRoute {
    overview_polyline: RawPolyline,
    #[serde(default)]
    legs: Vec<RawLeg>,
}

#[derive(Debug, Deserialize)]
struct RawPolyline {
    points: String,
}

#[derive(Debug, Deserialize)]
struct RawLeg {
    distance: RawValue,
    duration: RawValue,
    #[serde(default)]
    steps: Vec<RawStep>,
}

#[derive(Debug, Deserialize)]
struct RawStep {
    html_instructions: String,
    distance: RawValue,
    duration: RawValue,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    value: f64,
}

/// Parse a Google Directions JSON body into routes, in provider order.
pub fn parse_directions(body: &str, mode: TravelMode) -> Result<Vec<OutdoorRoute>> {
    let parsed: DirectionsResponse = serde_json::from_str(body)
        .map_err(|err| Error::collaborator(PROVIDER, format!("unexpected response: {err}")))?;

    if parsed.status != "OK" {
        let message = match parsed.error_message {
            Some(detail) => format!("{}: {}", parsed.status, detail),
            None => parsed.status,
        };
        return Err(Error::collaborator(PROVIDER, message));
    }

    parsed
        .routes
        .into_iter()
        .map(|route| {
            let coordinates = decode_polyline(&route.overview_polyline.points)
                .ok_or_else(|| Error::collaborator(PROVIDER, "malformed overview polyline"))?;
            let distance = route.legs.iter().map(|leg| leg.distance.value).sum();
            let duration = route.legs.iter().map(|leg| leg.duration.value).sum();
            let steps = route
                .legs
                .into_iter()
                .flat_map(|leg| leg.steps)
                .map(|step| OutdoorStep {
                    instruction: strip_html(&step.html_instructions),
                    distance: step.distance.value,
                    duration: step.duration.value,
                })
                .collect();
            Ok(OutdoorRoute {
                mode,
                distance,
                duration,
                steps,
                coordinates,
            })
        })
        .collect()
}

/// Remove markup tags from a provider instruction, collapsing whitespace.
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_provider_names_the_missing_key() {
        let err = UnconfiguredDirections
            .find_outdoor_path(
                LatLng::new(45.497, -73.579),
                LatLng::new(45.495, -73.578),
                TravelMode::Walking,
            )
            .unwrap_err();
        assert!(err.is_collaborator());
        assert!(err.to_string().contains(GOOGLE_MAPS_API_KEY_ENV));
    }

    const SAMPLE: &str = r#"{
        "status": "OK",
        "routes": [{
            "overview_polyline": {"points": "_p~iF~ps|U_ulLnnqC"},
            "legs": [{
                "distance": {"text": "0.3 km", "value": 312},
                "duration": {"text": "4 mins", "value": 241},
                "steps": [
                    {"html_instructions": "Head <b>south</b> on <b>Bishop St</b>",
                     "distance": {"text": "0.1 km", "value": 120},
                     "duration": {"text": "2 mins", "value": 90}},
                    {"html_instructions": "Turn <b>left</b><div style=\"font-size:0.9em\">Destination will be on the right</div>",
                     "distance": {"text": "0.2 km", "value": 192},
                     "duration": {"text": "3 mins", "value": 151}}
                ]
            }]
        }]
    }"#;

    #[test]
    fn parses_metric_values() {
        let routes = parse_directions(SAMPLE, TravelMode::Walking).unwrap();
        assert_eq!(routes.len(), 1);
        let route = &routes[0];
        assert_eq!(route.distance, 312.0);
        assert_eq!(route.duration, 241.0);
        assert_eq!(route.coordinates.len(), 2);
        assert_eq!(route.steps[0].instruction, "Head south on Bishop St");
        assert_eq!(
            route.steps[1].instruction,
            "Turn left Destination will be on the right"
        );
    }

    #[test]
    fn provider_status_becomes_error() {
        let err = parse_directions(
            r#"{"status": "REQUEST_DENIED", "error_message": "bad key", "routes": []}"#,
            TravelMode::Walking,
        )
        .unwrap_err();
        assert!(err.is_collaborator());
        assert!(err.to_string().contains("REQUEST_DENIED: bad key"));
    }

    #[test]
    fn zero_results_is_empty_error() {
        let err =
            parse_directions(r#"{"status": "ZERO_RESULTS"}"#, TravelMode::Walking).unwrap_err();
        assert!(err.to_string().contains("ZERO_RESULTS"));
    }

    #[test]
    fn travel_mode_round_trips_through_str() {
        assert_eq!("Walking".parse::<TravelMode>().unwrap(), TravelMode::Walking);
        assert_eq!(TravelMode::Transit.to_string(), "transit");
        assert!("teleport".parse::<TravelMode>().is_err());
    }
}
