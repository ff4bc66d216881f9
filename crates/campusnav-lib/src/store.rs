//! Campus graph store.
//!
//! Holds one [`CampusGraph`] per campus. Primary graphs are immutable after
//! construction; the accessibility subgraph is the only lazily-initialized
//! state and sits behind a per-campus [`OnceCell`], so concurrent first
//! callers block on a single build and never observe a partial graph.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::accessibility::build_accessibility_subgraph;
use crate::config::CostModel;
use crate::error::{Error, Result};
use crate::graph::{fuzzy_matches, Graph};
use crate::loader::load_campuses;

/// A campus graph together with its cached accessibility subgraph.
#[derive(Debug)]
pub struct CampusGraph {
    graph: Graph,
    accessible: OnceCell<Graph>,
}

impl CampusGraph {
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            accessible: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.graph.campus()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The accessibility subgraph, built on first use.
    pub fn accessible(&self) -> &Graph {
        self.accessible.get_or_init(|| {
            let subgraph = build_accessibility_subgraph(&self.graph);
            debug!(
                campus = %self.name(),
                edges = subgraph.edge_count(),
                removed = self.graph.edge_count() - subgraph.edge_count(),
                "accessibility subgraph built"
            );
            subgraph
        })
    }

    pub fn accessibility_built(&self) -> bool {
        self.accessible.get().is_some()
    }

    /// Primary graph, or the accessibility subgraph when `accessible` is set.
    pub fn select(&self, accessible: bool) -> &Graph {
        if accessible {
            self.accessible()
        } else {
            &self.graph
        }
    }
}

/// All loaded campuses, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct CampusGraphStore {
    campuses: Arc<BTreeMap<String, CampusGraph>>,
}

impl CampusGraphStore {
    /// Load every campus under `root`.
    pub fn load(root: &Path, cost: &CostModel) -> Result<Self> {
        let graphs = load_campuses(root, cost)?;
        Ok(Self::from_graphs(graphs.into_values()))
    }

    /// Build a store from already-constructed graphs.
    pub fn from_graphs<I>(graphs: I) -> Self
    where
        I: IntoIterator<Item = Graph>,
    {
        let campuses = graphs
            .into_iter()
            .map(|graph| (graph.campus().to_string(), CampusGraph::new(graph)))
            .collect();
        Self {
            campuses: Arc::new(campuses),
        }
    }

    /// Build every accessibility subgraph now instead of on first use.
    pub fn warm_accessibility(&self) {
        for campus in self.campuses.values() {
            campus.accessible();
        }
        info!(campuses = self.campuses.len(), "accessibility subgraphs prepared");
    }

    pub fn campus(&self, name: &str) -> Result<&CampusGraph> {
        self.campuses.get(name).ok_or_else(|| Error::CampusNotFound {
            campus: name.to_string(),
            suggestions: fuzzy_matches(self.campuses.keys().map(String::as_str), name, 3),
        })
    }

    /// Graph to route on for `campus`, honouring the accessibility flag.
    pub fn graph_for(&self, campus: &str, accessible: bool) -> Result<&Graph> {
        Ok(self.campus(campus)?.select(accessible))
    }

    pub fn campus_names(&self) -> impl Iterator<Item = &str> {
        self.campuses.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.campuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.campuses.is_empty()
    }

    pub fn total_nodes(&self) -> usize {
        self.campuses.values().map(|c| c.graph.node_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, Node, PoiType};
    use std::thread;

    fn campus(name: &str) -> Graph {
        let mut builder = GraphBuilder::new(name, CostModel::default());
        for (id, poi_type) in [
            ("x1_hw1", PoiType::Hallway),
            ("x1_stairs", PoiType::Stairs),
            ("x2_stairs", PoiType::Stairs),
        ] {
            builder.add_node(Node {
                id: id.to_string(),
                x: 0.0,
                y: 0.0,
                poi_type,
            });
        }
        builder.add_edge("x1_hw1", "x1_stairs");
        builder.add_edge("x1_stairs", "x2_stairs");
        builder.build()
    }

    #[test]
    fn accessibility_is_lazy_and_shared() {
        let store = CampusGraphStore::from_graphs([campus("hall")]);
        let hall = store.campus("hall").unwrap();
        assert!(!hall.accessibility_built());

        let observed: Vec<usize> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| hall.accessible() as *const Graph as usize))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(observed.windows(2).all(|pair| pair[0] == pair[1]));
        assert!(hall.accessibility_built());
        assert_eq!(hall.accessible().edge_count(), 0);
        assert_eq!(hall.graph().edge_count(), 2);
    }

    #[test]
    fn warm_builds_every_campus() {
        let store = CampusGraphStore::from_graphs([campus("hall"), campus("mb")]);
        store.warm_accessibility();
        assert!(store.campus("hall").unwrap().accessibility_built());
        assert!(store.campus("mb").unwrap().accessibility_built());
    }

    #[test]
    fn unknown_campus_suggests_names() {
        let store = CampusGraphStore::from_graphs([campus("hall")]);
        let err = store.campus("hal").unwrap_err();
        match err {
            Error::CampusNotFound { suggestions, .. } => assert_eq!(suggestions, vec!["hall"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
