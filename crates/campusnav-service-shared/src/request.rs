//! Request bodies and query parameters, with validation.

use serde::{Deserialize, Serialize};

use campusnav_lib::{IntegratedQuery, LatLng, Location, TravelMode, WeatherSnapshot};

use crate::ProblemDetails;

/// Upper bound on `k` for the k-shortest-paths endpoint.
pub const MAX_K_PATHS: usize = 20;
/// Upper bound on the number of stops in one request.
pub const MAX_STOPS: usize = 25;

/// Checks a request before any routing work starts.
pub trait Validate {
    /// The `request_id` ends up in the `instance` member of the problem.
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

fn require(field: &str, value: &str, request_id: &str) -> Result<(), Box<ProblemDetails>> {
    if value.trim().is_empty() {
        return Err(Box::new(ProblemDetails::bad_request(
            format!("The '{}' field is required and cannot be empty", field),
            request_id,
        )));
    }
    Ok(())
}

fn check_location(
    field: &str,
    location: &Location,
    request_id: &str,
) -> Result<(), Box<ProblemDetails>> {
    match location {
        Location::Indoor { campus, id } => {
            require(&format!("{}.campus", field), campus, request_id)?;
            require(&format!("{}.id", field), id, request_id)
        }
        Location::Outdoor(point) if !point.is_valid() => {
            Err(Box::new(ProblemDetails::bad_request(
                format!("The '{}' coordinate {} is out of range", field, point),
                request_id,
            )))
        }
        Location::Outdoor(_) => Ok(()),
    }
}

fn check_stop_count(count: usize, request_id: &str) -> Result<(), Box<ProblemDetails>> {
    if count > MAX_STOPS {
        return Err(Box::new(ProblemDetails::bad_request(
            format!("At most {} stops are allowed, got {}", MAX_STOPS, count),
            request_id,
        )));
    }
    Ok(())
}

/// Shortest path between two nodes of one campus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathRequest {
    pub campus: String,
    pub from: String,
    pub to: String,

    /// Route over the stairs- and escalator-free subgraph.
    #[serde(default)]
    pub accessible: bool,

    /// Include turn-by-turn directions in the response.
    #[serde(default)]
    pub directions: bool,
}

impl Validate for PathRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        require("campus", &self.campus, request_id)?;
        require("from", &self.from, request_id)?;
        require("to", &self.to, request_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KPathsRequest {
    pub campus: String,
    pub from: String,
    pub to: String,

    #[serde(default = "default_k")]
    pub k: usize,

    #[serde(default)]
    pub accessible: bool,
}

fn default_k() -> usize {
    3
}

impl Validate for KPathsRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        require("campus", &self.campus, request_id)?;
        require("from", &self.from, request_id)?;
        require("to", &self.to, request_id)?;
        if self.k == 0 || self.k > MAX_K_PATHS {
            return Err(Box::new(ProblemDetails::bad_request(
                format!("The 'k' field must be between 1 and {}", MAX_K_PATHS),
                request_id,
            )));
        }
        Ok(())
    }
}

/// Visit `stops` in order starting from `from`, all inside one campus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteThroughRequest {
    pub campus: String,
    pub from: String,
    pub stops: Vec<String>,

    #[serde(default)]
    pub accessible: bool,
}

impl Validate for RouteThroughRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        require("campus", &self.campus, request_id)?;
        require("from", &self.from, request_id)?;
        if self.stops.is_empty() {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'stops' field must name at least one destination",
                request_id,
            )));
        }
        check_stop_count(self.stops.len(), request_id)?;
        for stop in &self.stops {
            require("stops[]", stop, request_id)?;
        }
        Ok(())
    }
}

/// Route across campuses and streets.
///
/// Locations are tagged objects:
///
/// ```json
/// {"type": "indoor", "campus": "hall", "id": "h2_209"}
/// {"type": "outdoor", "lat": 45.4973, "lng": -73.5790}
/// ```
///
/// When `weather` is given it is used as-is and no live lookup happens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegratedRequest {
    pub start: Location,
    pub end: Location,

    #[serde(default)]
    pub stops: Vec<Location>,

    #[serde(default)]
    pub accessible: bool,

    #[serde(default)]
    pub mode: TravelMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherSnapshot>,
}

impl IntegratedRequest {
    pub fn to_query(&self) -> IntegratedQuery {
        IntegratedQuery::new(self.start.clone(), self.end.clone())
            .with_stops(self.stops.clone())
            .accessible(self.accessible)
            .with_mode(self.mode)
    }
}

impl Validate for IntegratedRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        check_location("start", &self.start, request_id)?;
        check_location("end", &self.end, request_id)?;
        check_stop_count(self.stops.len(), request_id)?;
        for stop in &self.stops {
            check_location("stops[]", stop, request_id)?;
        }
        Ok(())
    }
}

/// `GET /api/v1/weather` parameters: a coordinate or a campus name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub campus: Option<String>,
}

/// Where a [`WeatherQuery`] asks about.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherTarget {
    Point(LatLng),
    Campus(String),
}

impl WeatherQuery {
    /// Resolve the parameters into exactly one target.
    pub fn target(&self, request_id: &str) -> Result<WeatherTarget, Box<ProblemDetails>> {
        let bad = |detail: &str| Box::new(ProblemDetails::bad_request(detail, request_id));
        match (self.lat, self.lng, self.campus.as_deref()) {
            (Some(lat), Some(lng), None) => {
                let point = LatLng::new(lat, lng);
                if point.is_valid() {
                    Ok(WeatherTarget::Point(point))
                } else {
                    Err(bad("The 'lat'/'lng' coordinate is out of range"))
                }
            }
            (None, None, Some(campus)) if !campus.trim().is_empty() => {
                Ok(WeatherTarget::Campus(campus.trim().to_string()))
            }
            (None, None, _) => Err(bad("Pass either 'lat' and 'lng' or 'campus'")),
            (Some(_), Some(_), Some(_)) => Err(bad("Pass 'lat'/'lng' or 'campus', not both")),
            _ => Err(bad("Both 'lat' and 'lng' are required")),
        }
    }
}
