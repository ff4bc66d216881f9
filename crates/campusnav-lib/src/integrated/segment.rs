//! Result types of integrated route planning.

use serde::Serialize;

use crate::error::Error;
use crate::outdoor::OutdoorRoute;
use crate::path::PathResult;
use crate::weather::WeatherSnapshot;

/// One piece of an integrated path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Segment {
    /// A walk inside one campus graph.
    Indoor {
        campus: String,
        path: Vec<String>,
        distance: f64,
    },
    /// A street-level leg delegated to the outdoor provider.
    Outdoor {
        route: OutdoorRoute,
        distance: f64,
        /// Set when bad weather changed which candidate was chosen.
        weather_adjusted: bool,
    },
    /// An underground connector between two campuses.
    Tunnel {
        from_campus: String,
        from_node: String,
        to_campus: String,
        to_node: String,
        distance: f64,
    },
}

impl Segment {
    pub fn distance(&self) -> f64 {
        match self {
            Segment::Indoor { distance, .. }
            | Segment::Outdoor { distance, .. }
            | Segment::Tunnel { distance, .. } => *distance,
        }
    }

    pub fn is_outdoor(&self) -> bool {
        matches!(self, Segment::Outdoor { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Segment::Indoor { .. } => "indoor",
            Segment::Outdoor { .. } => "outdoor",
            Segment::Tunnel { .. } => "tunnel",
        }
    }
}

/// Ordered segments from start to end plus the aggregate distance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegratedPath {
    pub segments: Vec<Segment>,
    pub total_distance: f64,
    /// Conditions the route was planned under, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherSnapshot>,
}

impl IntegratedPath {
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        let total_distance = segments.iter().map(Segment::distance).sum();
        Self {
            segments,
            total_distance,
            weather: None,
        }
    }

    /// Append the segments of the following leg.
    pub fn extend(&mut self, next: IntegratedPath) {
        self.total_distance += next.total_distance;
        self.segments.extend(next.segments);
    }

    /// Distance walked outside.
    pub fn outdoor_distance(&self) -> f64 {
        self.segments
            .iter()
            .filter(|segment| segment.is_outdoor())
            .map(Segment::distance)
            .sum()
    }

    pub fn uses_tunnel(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Tunnel { .. }))
    }

    pub fn weather_adjusted(&self) -> bool {
        self.segments.iter().any(|segment| {
            matches!(
                segment,
                Segment::Outdoor {
                    weather_adjusted: true,
                    ..
                }
            )
        })
    }
}

/// Outcome of a route query as reported to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RouteResult {
    /// A single-campus indoor path.
    Simple(PathResult),
    Integrated(IntegratedPath),
    Failed { error: String },
}

impl RouteResult {
    pub fn is_success(&self) -> bool {
        !matches!(self, RouteResult::Failed { .. })
    }

    pub fn total_distance(&self) -> Option<f64> {
        match self {
            RouteResult::Simple(path) => Some(path.distance),
            RouteResult::Integrated(path) => Some(path.total_distance),
            RouteResult::Failed { .. } => None,
        }
    }
}

impl From<Error> for RouteResult {
    fn from(err: Error) -> Self {
        RouteResult::Failed {
            error: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outdoor::TravelMode;

    fn outdoor(distance: f64) -> Segment {
        Segment::Outdoor {
            route: OutdoorRoute {
                mode: TravelMode::Walking,
                distance,
                duration: distance / 1.4,
                steps: Vec::new(),
                coordinates: Vec::new(),
            },
            distance,
            weather_adjusted: false,
        }
    }

    fn indoor(distance: f64) -> Segment {
        Segment::Indoor {
            campus: "hall".to_string(),
            path: vec!["h1_a".to_string(), "h1_b".to_string()],
            distance,
        }
    }

    #[test]
    fn totals_and_outdoor_share() {
        let mut path = IntegratedPath::from_segments(vec![indoor(12.0), outdoor(200.0)]);
        path.extend(IntegratedPath::from_segments(vec![indoor(8.0)]));
        assert_eq!(path.segments.len(), 3);
        assert_eq!(path.total_distance, 220.0);
        assert_eq!(path.outdoor_distance(), 200.0);
        assert!(!path.uses_tunnel());
        assert!(!path.weather_adjusted());
    }

    #[test]
    fn segments_serialize_with_type_tag() {
        let json = serde_json::to_value(indoor(3.5)).unwrap();
        assert_eq!(json["type"], "indoor");
        assert_eq!(json["campus"], "hall");
        let json = serde_json::to_value(outdoor(10.0)).unwrap();
        assert_eq!(json["type"], "outdoor");
        assert_eq!(json["weather_adjusted"], false);
    }

    #[test]
    fn failed_result_carries_message() {
        let result = RouteResult::from(Error::NoValidIntegratedPath {
            start: "hall:h1_a".to_string(),
            goal: "mb:mb1_b".to_string(),
        });
        assert!(!result.is_success());
        assert_eq!(result.total_distance(), None);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["type"], "failed");
        assert!(json["error"].as_str().unwrap().contains("hall:h1_a"));
    }
}
