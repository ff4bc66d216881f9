use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::CostModel;
use crate::cost::edge_cost;
use crate::error::{Error, Result};

/// Dense index of a node inside one campus graph.
pub type NodeIndex = usize;

/// Minimum Jaro-Winkler similarity for an id to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Category of a node, governing the edge cost rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoiType {
    Room,
    Hallway,
    Elevator,
    Stairs,
    Escalator,
    Entrance,
}

impl PoiType {
    /// Vertical-transit nodes connect floors.
    pub fn is_connector(self) -> bool {
        matches!(self, PoiType::Elevator | PoiType::Stairs | PoiType::Escalator)
    }
}

impl fmt::Display for PoiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            PoiType::Room => "room",
            PoiType::Hallway => "hallway",
            PoiType::Elevator => "elevator",
            PoiType::Stairs => "stairs",
            PoiType::Escalator => "escalator",
            PoiType::Entrance => "entrance",
        };
        f.write_str(value)
    }
}

/// A navigable point on a floor plan. Coordinates are in drawing units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub poi_type: PoiType,
}

/// Classification for the edge used in the routing graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Walk,
    Elevator,
    Escalator,
    Stairs,
}

/// Edge within the routing graph. Stored once per direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub target: NodeIndex,
    pub kind: EdgeKind,
    /// Optimization cost.
    pub weight: f64,
    /// Physical length in metres used for reporting.
    pub distance: f64,
}

#[derive(Debug)]
struct NodeTable {
    campus: String,
    nodes: Vec<Node>,
    index: HashMap<String, NodeIndex>,
}

/// Undirected weighted graph for one campus.
///
/// Cloning is cheap: the node table and adjacency are shared behind `Arc`.
/// Derived graphs (see [`Graph::retain_edges`]) share the node table with
/// their source.
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Arc<NodeTable>,
    adjacency: Arc<Vec<Vec<Edge>>>,
}

impl Graph {
    /// Name of the campus this graph was built for.
    pub fn campus(&self) -> &str {
        &self.nodes.campus
    }

    pub fn node_count(&self) -> usize {
        self.nodes.nodes.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes.nodes[index]
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.nodes.iter()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.index.contains_key(id)
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.nodes.index.get(id).copied()
    }

    /// Resolve a node id, returning [`Error::NodeNotFound`] with close
    /// matches when it is unknown.
    pub fn resolve(&self, id: &str) -> Result<NodeIndex> {
        self.index_of(id).ok_or_else(|| Error::NodeNotFound {
            campus: self.campus().to_string(),
            node: id.to_string(),
            suggestions: self.fuzzy_node_matches(id, 3),
        })
    }

    /// Node ids most similar to `query`, best match first.
    pub fn fuzzy_node_matches(&self, query: &str, limit: usize) -> Vec<String> {
        fuzzy_matches(self.nodes.nodes.iter().map(|n| n.id.as_str()), query, limit)
    }

    /// Return the neighbours for a given node.
    pub fn neighbours(&self, node: NodeIndex) -> &[Edge] {
        self.adjacency
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn edge_between(&self, a: NodeIndex, b: NodeIndex) -> Option<&Edge> {
        self.neighbours(a).iter().find(|edge| edge.target == b)
    }

    /// Every undirected edge exactly once, as `(lower, higher, edge)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, &Edge)> {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(source, edges)| edges.iter().map(move |edge| (source, edge.target, edge)))
            .filter(|(source, target, _)| source < target)
    }

    /// Sum of `(weight, distance)` along consecutive nodes, or `None` if two
    /// consecutive nodes are not adjacent.
    pub fn walk_cost(&self, path: &[NodeIndex]) -> Option<(f64, f64)> {
        path.windows(2).try_fold((0.0, 0.0), |(weight, distance), pair| {
            self.edge_between(pair[0], pair[1])
                .map(|edge| (weight + edge.weight, distance + edge.distance))
        })
    }

    /// Drawing coordinates for a sequence of node ids.
    pub fn coordinates(&self, path: &[String]) -> Result<Vec<(f64, f64)>> {
        path.iter()
            .map(|id| {
                let node = self.node(self.resolve(id)?);
                Ok((node.x, node.y))
            })
            .collect()
    }

    /// Build a graph over the same node set keeping only the edges for which
    /// `keep(a, b)` returns `true`.
    pub fn retain_edges<F>(&self, keep: F) -> Graph
    where
        F: Fn(&Node, &Node) -> bool,
    {
        let adjacency = self
            .adjacency
            .iter()
            .enumerate()
            .map(|(source, edges)| {
                edges
                    .iter()
                    .filter(|edge| keep(self.node(source), self.node(edge.target)))
                    .cloned()
                    .collect()
            })
            .collect();
        Graph {
            nodes: Arc::clone(&self.nodes),
            adjacency: Arc::new(adjacency),
        }
    }

    /// `true` when both graphs share the same node table allocation.
    pub fn shares_nodes_with(&self, other: &Graph) -> bool {
        Arc::ptr_eq(&self.nodes, &other.nodes)
    }
}

/// Incrementally assembles a [`Graph`]. Nodes must be added before the
/// edges that reference them.
#[derive(Debug)]
pub struct GraphBuilder {
    campus: String,
    cost: CostModel,
    nodes: Vec<Node>,
    index: HashMap<String, NodeIndex>,
    adjacency: Vec<Vec<Edge>>,
}

impl GraphBuilder {
    pub fn new(campus: impl Into<String>, cost: CostModel) -> Self {
        Self {
            campus: campus.into(),
            cost,
            nodes: Vec::new(),
            index: HashMap::new(),
            adjacency: Vec::new(),
        }
    }

    /// Add a node. A repeated id replaces the earlier attributes.
    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        if let Some(&existing) = self.index.get(&node.id) {
            warn!(
                campus = %self.campus,
                node = %node.id,
                "duplicate node id; keeping latest attributes"
            );
            self.nodes[existing] = node;
            return existing;
        }
        let index = self.nodes.len();
        self.index.insert(node.id.clone(), index);
        self.nodes.push(node);
        self.adjacency.push(Vec::new());
        index
    }

    /// Connect two existing nodes, computing the cost from their attributes.
    ///
    /// Returns `false` without modifying the graph when either endpoint is
    /// unknown or both ids are the same node. Re-adding an edge replaces it.
    pub fn add_edge(&mut self, a: &str, b: &str) -> bool {
        let (Some(&ia), Some(&ib)) = (self.index.get(a), self.index.get(b)) else {
            return false;
        };
        if ia == ib {
            return false;
        }
        let cost = edge_cost(&self.cost, &self.nodes[ia], &self.nodes[ib]);
        self.upsert(ia, ib, cost.kind, cost.weight, cost.distance);
        self.upsert(ib, ia, cost.kind, cost.weight, cost.distance);
        true
    }

    fn upsert(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        kind: EdgeKind,
        weight: f64,
        distance: f64,
    ) {
        let edge = Edge {
            target: to,
            kind,
            weight,
            distance,
        };
        let edges = &mut self.adjacency[from];
        match edges.iter_mut().find(|existing| existing.target == to) {
            Some(existing) => *existing = edge,
            None => edges.push(edge),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn build(self) -> Graph {
        Graph {
            nodes: Arc::new(NodeTable {
                campus: self.campus,
                nodes: self.nodes,
                index: self.index,
            }),
            adjacency: Arc::new(self.adjacency),
        }
    }
}

pub(crate) fn fuzzy_matches<'a, I>(candidates: I, query: &str, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = query.to_lowercase();
    let mut scored: Vec<(f64, &str)> = candidates
        .into_iter()
        .map(|candidate| (strsim::jaro_winkler(&needle, &candidate.to_lowercase()), candidate))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, x: f64, y: f64, poi_type: PoiType) -> Node {
        Node {
            id: id.to_string(),
            x,
            y,
            poi_type,
        }
    }

    fn sample() -> Graph {
        let mut builder = GraphBuilder::new("hall", CostModel::default());
        builder.add_node(node("h1_101", 0.0, 0.0, PoiType::Room));
        builder.add_node(node("h1_hw1", 200.0, 0.0, PoiType::Hallway));
        builder.add_node(node("h1_elevator", 200.0, 400.0, PoiType::Elevator));
        builder.add_node(node("h2_elevator", 200.0, 400.0, PoiType::Elevator));
        assert!(builder.add_edge("h1_101", "h1_hw1"));
        assert!(builder.add_edge("h1_hw1", "h1_elevator"));
        assert!(builder.add_edge("h1_elevator", "h2_elevator"));
        builder.build()
    }

    #[test]
    fn edges_are_undirected() {
        let graph = sample();
        let a = graph.index_of("h1_101").unwrap();
        let b = graph.index_of("h1_hw1").unwrap();
        let forward = graph.edge_between(a, b).expect("forward edge");
        let backward = graph.edge_between(b, a).expect("backward edge");
        assert_eq!(forward.weight, backward.weight);
        assert_eq!(forward.distance, backward.distance);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.edges().count(), 3);
    }

    #[test]
    fn unknown_endpoint_is_rejected() {
        let mut builder = GraphBuilder::new("hall", CostModel::default());
        builder.add_node(node("h1_101", 0.0, 0.0, PoiType::Room));
        assert!(!builder.add_edge("h1_101", "h1_missing"));
        assert!(!builder.add_edge("h1_101", "h1_101"));
        let graph = builder.build();
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn repeated_edge_replaces_previous() {
        let mut builder = GraphBuilder::new("hall", CostModel::default());
        builder.add_node(node("a", 0.0, 0.0, PoiType::Room));
        builder.add_node(node("b", 100.0, 0.0, PoiType::Room));
        builder.add_edge("a", "b");
        builder.add_edge("b", "a");
        let graph = builder.build();
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn walk_cost_sums_edges() {
        let graph = sample();
        let path: Vec<NodeIndex> = ["h1_101", "h1_hw1", "h1_elevator", "h2_elevator"]
            .iter()
            .map(|id| graph.index_of(id).unwrap())
            .collect();
        let (weight, distance) = graph.walk_cost(&path).expect("valid walk");
        assert!((distance - (1.0 + 2.0 + 3.0)).abs() < 1e-9);
        assert!((weight - distance).abs() < 1e-9);

        let broken = [path[0], path[3]];
        assert!(graph.walk_cost(&broken).is_none());
    }

    #[test]
    fn resolve_offers_suggestions() {
        let graph = sample();
        let err = graph.resolve("h1_elevatr").expect_err("unknown id");
        match err {
            Error::NodeNotFound {
                campus,
                suggestions,
                ..
            } => {
                assert_eq!(campus, "hall");
                assert_eq!(suggestions.first().map(String::as_str), Some("h1_elevator"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn retain_edges_keeps_node_table() {
        let graph = sample();
        let filtered = graph.retain_edges(|a, b| {
            a.poi_type != PoiType::Elevator && b.poi_type != PoiType::Elevator
        });
        assert!(filtered.shares_nodes_with(&graph));
        assert_eq!(filtered.node_count(), graph.node_count());
        assert_eq!(filtered.edge_count(), 1);
    }

    #[test]
    fn coordinates_follow_path_order() {
        let graph = sample();
        let coords = graph
            .coordinates(&["h1_hw1".to_string(), "h1_101".to_string()])
            .expect("known ids");
        assert_eq!(coords, vec![(200.0, 0.0), (0.0, 0.0)]);
    }
}
