//! Edge cost model.
//!
//! Every edge carries two numbers. `weight` drives path optimization and is
//! biased against stairs and escalators; `distance` stays physically
//! meaningful and is what gets reported and turned into walking time.

use crate::config::CostModel;
use crate::graph::{EdgeKind, Node, PoiType};

/// Cost of traversing a single edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCost {
    pub kind: EdgeKind,
    pub weight: f64,
    pub distance: f64,
}

/// Compute the cost of the edge between two adjacent nodes.
///
/// Only a pair of nodes of the same vertical-transit type counts as a floor
/// change; anything else is a walking edge priced by scaled Euclidean
/// distance.
pub fn edge_cost(model: &CostModel, a: &Node, b: &Node) -> EdgeCost {
    match (a.poi_type, b.poi_type) {
        (PoiType::Elevator, PoiType::Elevator) => EdgeCost {
            kind: EdgeKind::Elevator,
            weight: model.elevator_cost,
            distance: model.elevator_cost,
        },
        (PoiType::Escalator, PoiType::Escalator) => EdgeCost {
            kind: EdgeKind::Escalator,
            weight: model.escalator_cost * model.escalator_bias,
            distance: model.escalator_cost,
        },
        (PoiType::Stairs, PoiType::Stairs) => EdgeCost {
            kind: EdgeKind::Stairs,
            weight: model.stairs_cost * model.stairs_bias,
            distance: model.stairs_cost,
        },
        _ => {
            let distance = scaled_distance(model, a, b);
            EdgeCost {
                kind: EdgeKind::Walk,
                weight: distance,
                distance,
            }
        }
    }
}

fn scaled_distance(model: &CostModel, a: &Node, b: &Node) -> f64 {
    let dx = (a.x - b.x) * model.scale_factor;
    let dy = (a.y - b.y) * model.scale_factor;
    dx.hypot(dy)
}
