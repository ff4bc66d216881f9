//! Sequential multi-destination routing.

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, LegFailure, Result};
use crate::graph::Graph;
use crate::path::{shortest_path, PathResult};

/// Outcome of routing one leg of a multi-stop route.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LegOutcome {
    Routed {
        destination: String,
        path: Vec<String>,
        distance: f64,
    },
    Failed {
        destination: String,
        error: String,
    },
}

impl LegOutcome {
    pub fn destination(&self) -> &str {
        match self {
            LegOutcome::Routed { destination, .. } | LegOutcome::Failed { destination, .. } => {
                destination
            }
        }
    }

    pub fn is_routed(&self) -> bool {
        matches!(self, LegOutcome::Routed { .. })
    }
}

/// Per-leg report of a multi-stop route plus the stitched path so far.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiDestinationReport {
    pub legs: Vec<LegOutcome>,
    /// Node sequence of all successful legs, joints not duplicated.
    pub path: Vec<String>,
    pub total_distance: f64,
    #[serde(skip)]
    total_weight: f64,
}

impl MultiDestinationReport {
    pub fn is_complete(&self) -> bool {
        self.legs.iter().all(LegOutcome::is_routed)
    }

    pub fn failures(&self) -> Vec<LegFailure> {
        self.legs
            .iter()
            .filter_map(|leg| match leg {
                LegOutcome::Failed { destination, error } => Some(LegFailure {
                    destination: destination.clone(),
                    error: error.clone(),
                }),
                LegOutcome::Routed { .. } => None,
            })
            .collect()
    }

    /// The stitched path, or [`Error::PartialMultiDestinationFailure`] when
    /// any leg failed.
    pub fn into_path(self) -> Result<PathResult> {
        if !self.is_complete() {
            return Err(Error::PartialMultiDestinationFailure {
                failed: self.failures(),
                total_legs: self.legs.len(),
                accumulated_distance: self.total_distance,
            });
        }
        Ok(PathResult {
            path: self.path,
            distance: self.total_distance,
            weight: self.total_weight,
        })
    }
}

/// Route from `start` through each destination in order.
///
/// Every leg is attempted. A failed leg is reported individually and does
/// not move the current position, so the next leg starts from the last stop
/// that was actually reached.
pub fn route_through<S: AsRef<str>>(
    graph: &Graph,
    start: &str,
    destinations: &[S],
) -> MultiDestinationReport {
    let mut report = MultiDestinationReport {
        legs: Vec::with_capacity(destinations.len()),
        path: Vec::new(),
        total_distance: 0.0,
        total_weight: 0.0,
    };
    if graph.contains(start) {
        report.path.push(start.to_string());
    }

    let mut current = start.to_string();
    for destination in destinations {
        let destination = destination.as_ref();
        match shortest_path(graph, &current, destination) {
            Ok(leg) => {
                report.path.extend(leg.path.iter().skip(1).cloned());
                report.total_distance += leg.distance;
                report.total_weight += leg.weight;
                report.legs.push(LegOutcome::Routed {
                    destination: destination.to_string(),
                    path: leg.path,
                    distance: leg.distance,
                });
                current = destination.to_string();
            }
            Err(err) => {
                debug!(from = %current, to = destination, error = %err, "leg could not be routed");
                report.legs.push(LegOutcome::Failed {
                    destination: destination.to_string(),
                    error: err.to_string(),
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CostModel;
    use crate::graph::{GraphBuilder, Node, PoiType};

    fn line() -> Graph {
        let model = CostModel {
            scale_factor: 1.0,
            ..CostModel::default()
        };
        let mut builder = GraphBuilder::new("test", model);
        for (id, x) in [("a", 0.0), ("b", 1.0), ("c", 3.0), ("island", 50.0)] {
            builder.add_node(Node {
                id: id.to_string(),
                x,
                y: 0.0,
                poi_type: PoiType::Room,
            });
        }
        builder.add_edge("a", "b");
        builder.add_edge("b", "c");
        builder.build()
    }

    #[test]
    fn joints_are_not_duplicated() {
        let graph = line();
        let report = route_through(&graph, "a", &["b", "c"]);
        assert!(report.is_complete());
        let path = report.into_path().unwrap();
        assert_eq!(path.path, vec!["a", "b", "c"]);
        assert_eq!(path.distance, 3.0);
    }

    #[test]
    fn total_equals_sum_of_legs() {
        let graph = line();
        let report = route_through(&graph, "a", &["c", "b"]);
        let first = shortest_path(&graph, "a", "c").unwrap().distance;
        let second = shortest_path(&graph, "c", "b").unwrap().distance;
        assert_eq!(report.total_distance, first + second);
        assert_eq!(report.path, vec!["a", "b", "c", "b"]);
    }

    #[test]
    fn failed_leg_keeps_current_position() {
        let graph = line();
        let report = route_through(&graph, "a", &["island", "ghost", "c"]);
        assert_eq!(report.legs.len(), 3);
        assert!(!report.legs[0].is_routed());
        assert!(!report.legs[1].is_routed());
        match &report.legs[2] {
            LegOutcome::Routed { path, .. } => {
                assert_eq!(path.first().map(String::as_str), Some("a"))
            }
            other => panic!("unexpected leg: {other:?}"),
        }
        assert_eq!(report.total_distance, 3.0);

        let err = report.into_path().unwrap_err();
        match err {
            Error::PartialMultiDestinationFailure {
                failed,
                total_legs,
                accumulated_distance,
            } => {
                assert_eq!(total_legs, 3);
                assert_eq!(accumulated_distance, 3.0);
                let names: Vec<_> = failed.iter().map(|f| f.destination.as_str()).collect();
                assert_eq!(names, vec!["island", "ghost"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn report_serializes_legs_flat() {
        let graph = line();
        let report = route_through(&graph, "a", &["ghost"]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["legs"][0]["destination"], "ghost");
        assert!(json["legs"][0]["error"].as_str().unwrap().contains("ghost"));
        assert!(json.get("total_weight").is_none());
    }
}
