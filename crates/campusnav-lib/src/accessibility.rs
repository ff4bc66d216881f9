//! Accessibility-filtered graphs.
//!
//! Filtering is by id substring rather than by `poi_type` so that ids which
//! embed a `stairs`/`escalator` marker are caught as well.

use crate::graph::Graph;

const INACCESSIBLE_MARKERS: [&str; 2] = ["stairs", "escalator"];

/// `true` when a node id marks it as unreachable without stairs or escalators.
pub fn is_inaccessible_id(id: &str) -> bool {
    INACCESSIBLE_MARKERS.iter().any(|marker| id.contains(marker))
}

/// Copy of `graph` with every edge touching a stairs or escalator node
/// removed. The node set is unchanged; elevator edges are retained.
pub fn build_accessibility_subgraph(graph: &Graph) -> Graph {
    graph.retain_edges(|a, b| !is_inaccessible_id(&a.id) && !is_inaccessible_id(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CostModel;
    use crate::graph::{GraphBuilder, Node, PoiType};

    fn node(id: &str, poi_type: PoiType) -> Node {
        Node {
            id: id.to_string(),
            x: 0.0,
            y: 0.0,
            poi_type,
        }
    }

    #[test]
    fn removes_stairs_and_escalator_edges_only() {
        let mut builder = GraphBuilder::new("hall", CostModel::default());
        builder.add_node(node("h1_hw1", PoiType::Hallway));
        builder.add_node(node("h1_stairs", PoiType::Stairs));
        builder.add_node(node("h2_stairs", PoiType::Stairs));
        builder.add_node(node("h1_escalator", PoiType::Escalator));
        builder.add_node(node("h1_elevator", PoiType::Elevator));
        builder.add_node(node("h2_elevator", PoiType::Elevator));
        // Mislabelled as a hallway but the id still marks it as stairs.
        builder.add_node(node("h1_stairs_landing", PoiType::Hallway));
        builder.add_edge("h1_hw1", "h1_stairs");
        builder.add_edge("h1_stairs", "h2_stairs");
        builder.add_edge("h1_hw1", "h1_escalator");
        builder.add_edge("h1_hw1", "h1_elevator");
        builder.add_edge("h1_elevator", "h2_elevator");
        builder.add_edge("h1_hw1", "h1_stairs_landing");
        let graph = builder.build();

        let accessible = build_accessibility_subgraph(&graph);
        assert_eq!(accessible.node_count(), graph.node_count());
        assert_eq!(accessible.edge_count(), 2);
        for (a, b, _) in accessible.edges() {
            assert!(!is_inaccessible_id(&accessible.node(a).id));
            assert!(!is_inaccessible_id(&accessible.node(b).id));
        }
    }

    #[test]
    fn marker_detection() {
        assert!(is_inaccessible_id("mb_s2_escalator_up"));
        assert!(is_inaccessible_id("h8_stairs"));
        assert!(!is_inaccessible_id("h8_elevator"));
        assert!(!is_inaccessible_id("h8_843"));
    }
}
