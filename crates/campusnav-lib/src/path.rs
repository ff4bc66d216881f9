use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::{Edge, Graph, NodeIndex};

/// Constraints applied during pathfinding.
#[derive(Debug, Default, Clone)]
pub struct PathConstraints {
    /// Nodes that must not appear in the resulting path.
    pub blocked_nodes: HashSet<NodeIndex>,
    /// Undirected edges that must not be traversed, stored as `(lower, higher)`.
    pub blocked_edges: HashSet<(NodeIndex, NodeIndex)>,
}

impl PathConstraints {
    pub fn block_node(&mut self, node: NodeIndex) {
        self.blocked_nodes.insert(node);
    }

    pub fn block_edge(&mut self, a: NodeIndex, b: NodeIndex) {
        self.blocked_edges.insert(ordered(a, b));
    }

    fn allows(&self, from: NodeIndex, edge: &Edge) -> bool {
        if self.blocked_nodes.contains(&edge.target) {
            return false;
        }
        !self.blocked_edges.contains(&ordered(from, edge.target))
    }
}

fn ordered(a: NodeIndex, b: NodeIndex) -> (NodeIndex, NodeIndex) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// A path expressed in graph indices together with its totals.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedPath {
    pub nodes: Vec<NodeIndex>,
    pub weight: f64,
    pub distance: f64,
}

/// Ordered node ids of a simple path plus its totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    pub path: Vec<String>,
    /// Total physical distance in metres.
    pub distance: f64,
    /// Total optimization cost.
    pub weight: f64,
}

impl PathResult {
    pub fn from_indexed(graph: &Graph, indexed: &IndexedPath) -> Self {
        Self {
            path: indexed
                .nodes
                .iter()
                .map(|&index| graph.node(index).id.clone())
                .collect(),
            distance: indexed.distance,
            weight: indexed.weight,
        }
    }

    /// Number of edges in the path.
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }

    pub fn goal(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }

    /// Estimated walking time at `speed` metres per second.
    pub fn walking_time(&self, speed: f64) -> Duration {
        walking_time(self.distance, speed)
    }
}

pub(crate) fn walking_time(distance: f64, speed: f64) -> Duration {
    if speed <= 0.0 || !distance.is_finite() {
        return Duration::ZERO;
    }
    Duration::from_secs_f64((distance / speed).max(0.0))
}

/// Shortest path between two node ids, minimizing `weight` and reporting the
/// `distance` along the same path.
///
/// Fails with [`Error::NodeNotFound`] when an id is absent from the graph and
/// with [`Error::NoPathFound`] when both exist but are disconnected.
pub fn shortest_path(graph: &Graph, start: &str, goal: &str) -> Result<PathResult> {
    let start_index = graph.resolve(start)?;
    let goal_index = graph.resolve(goal)?;
    find_route_dijkstra(graph, start_index, goal_index, &PathConstraints::default())
        .map(|indexed| PathResult::from_indexed(graph, &indexed))
        .ok_or_else(|| Error::NoPathFound {
            start: start.to_string(),
            goal: goal.to_string(),
        })
}

/// Up to `k` simple paths between two node ids in non-decreasing weight
/// order (Yen's algorithm). Returns fewer, possibly none, when fewer exist.
pub fn k_shortest_paths(
    graph: &Graph,
    start: &str,
    goal: &str,
    k: usize,
) -> Result<Vec<PathResult>> {
    let start_index = graph.resolve(start)?;
    let goal_index = graph.resolve(goal)?;
    Ok(find_k_routes(graph, start_index, goal_index, k)
        .iter()
        .map(|indexed| PathResult::from_indexed(graph, indexed))
        .collect())
}

/// Yen's k-shortest loopless paths over graph indices.
pub fn find_k_routes(
    graph: &Graph,
    start: NodeIndex,
    goal: NodeIndex,
    k: usize,
) -> Vec<IndexedPath> {
    if k == 0 {
        return Vec::new();
    }
    let Some(first) = find_route_dijkstra(graph, start, goal, &PathConstraints::default()) else {
        return Vec::new();
    };

    let mut accepted = vec![first];
    let mut candidates: Vec<IndexedPath> = Vec::new();

    while accepted.len() < k {
        let previous = match accepted.last() {
            Some(path) => path.nodes.clone(),
            None => break,
        };

        for spur_at in 0..previous.len().saturating_sub(1) {
            let spur = previous[spur_at];
            let root = &previous[..=spur_at];

            let mut constraints = PathConstraints::default();
            for path in &accepted {
                if path.nodes.len() > spur_at + 1 && path.nodes[..=spur_at] == *root {
                    constraints.block_edge(path.nodes[spur_at], path.nodes[spur_at + 1]);
                }
            }
            for &node in &root[..spur_at] {
                constraints.block_node(node);
            }

            let Some(spur_path) = find_route_dijkstra(graph, spur, goal, &constraints) else {
                continue;
            };

            let mut nodes = root[..spur_at].to_vec();
            nodes.extend(spur_path.nodes);
            let seen = accepted
                .iter()
                .chain(candidates.iter())
                .any(|existing| existing.nodes == nodes);
            if seen {
                continue;
            }
            if let Some((weight, distance)) = graph.walk_cost(&nodes) {
                candidates.push(IndexedPath {
                    nodes,
                    weight,
                    distance,
                });
            }
        }

        let best = candidates
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| compare_paths(a, b))
            .map(|(index, _)| index);
        match best {
            Some(index) => accepted.push(candidates.swap_remove(index)),
            None => break,
        }
    }

    accepted
}

fn compare_paths(a: &IndexedPath, b: &IndexedPath) -> Ordering {
    a.weight
        .total_cmp(&b.weight)
        .then_with(|| a.nodes.len().cmp(&b.nodes.len()))
        .then_with(|| a.nodes.cmp(&b.nodes))
}

/// Run Dijkstra's algorithm to find the lowest-weight path that satisfies the
/// provided constraints.
pub fn find_route_dijkstra(
    graph: &Graph,
    start: NodeIndex,
    goal: NodeIndex,
    constraints: &PathConstraints,
) -> Option<IndexedPath> {
    if start == goal {
        return Some(IndexedPath {
            nodes: vec![start],
            weight: 0.0,
            distance: 0.0,
        });
    }

    let node_count = graph.node_count();
    let mut weights = vec![f64::INFINITY; node_count];
    let mut distances = vec![0.0; node_count];
    let mut parents: Vec<Option<NodeIndex>> = vec![None; node_count];
    let mut settled = vec![false; node_count];
    let mut queue = BinaryHeap::new();

    weights[start] = 0.0;
    queue.push(QueueEntry::new(start, 0.0));

    while let Some(entry) = queue.pop() {
        if settled[entry.node] {
            continue;
        }
        settled[entry.node] = true;

        if entry.node == goal {
            return Some(IndexedPath {
                nodes: reconstruct_path(&parents, start, goal),
                weight: weights[goal],
                distance: distances[goal],
            });
        }

        let current_weight = weights[entry.node];
        for edge in graph.neighbours(entry.node) {
            let next = edge.target;
            if settled[next] || !constraints.allows(entry.node, edge) {
                continue;
            }

            let next_weight = current_weight + edge.weight;
            if next_weight < weights[next] {
                weights[next] = next_weight;
                distances[next] = distances[entry.node] + edge.distance;
                parents[next] = Some(entry.node);
                queue.push(QueueEntry::new(next, next_weight));
            }
        }
    }

    None
}

fn reconstruct_path(
    parents: &[Option<NodeIndex>],
    start: NodeIndex,
    goal: NodeIndex,
) -> Vec<NodeIndex> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node);
        if node == start {
            break;
        }
        current = parents[node];
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: NodeIndex,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(node: NodeIndex, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
