//! Load campus graphs from directories of JSON floor files.
//!
//! Layout: one subdirectory per campus under the data root, each holding any
//! number of `*.json` files (searched recursively) of the form
//!
//! ```json
//! {"nodes": [{"id": "h2_209", "x": 10.0, "y": 20.0, "poi_type": "room"}],
//!  "edges": [["h2_209", "h2_hw8"]]}
//! ```
//!
//! All nodes from every file are added before any edge so that edges may
//! cross file boundaries (floor-to-floor connectors).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::CostModel;
use crate::error::{Error, Result};
use crate::graph::{Graph, GraphBuilder, Node};

#[derive(Debug, Default, Deserialize)]
struct FloorFile {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Vec<String>>,
}

/// Load every campus found under `root`, keyed by directory name.
pub fn load_campuses(root: &Path, cost: &CostModel) -> Result<BTreeMap<String, Graph>> {
    if !root.is_dir() {
        return Err(Error::DataDirNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut campus_dirs: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir() && !is_hidden(path))
        .collect();
    campus_dirs.sort();

    let mut campuses = BTreeMap::new();
    for dir in campus_dirs {
        let Some(name) = dir.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            continue;
        };
        let graph = load_campus(&name, &dir, cost)?;
        if graph.node_count() == 0 {
            warn!(campus = %name, path = %dir.display(), "campus directory has no nodes; skipping");
            continue;
        }
        campuses.insert(name, graph);
    }

    info!(campuses = campuses.len(), root = %root.display(), "campus graphs loaded");
    Ok(campuses)
}

/// Build a single campus graph from all JSON files under `dir`.
///
/// Edges that reference unknown nodes, or that are not exactly a pair of
/// ids, are skipped with a warning.
pub fn load_campus(campus: &str, dir: &Path, cost: &CostModel) -> Result<Graph> {
    let files = collect_json_files(dir)?;
    let floors = files
        .iter()
        .map(|path| read_floor_file(path).map(|floor| (path.as_path(), floor)))
        .collect::<Result<Vec<_>>>()?;

    let mut builder = GraphBuilder::new(campus, *cost);
    for (_, floor) in &floors {
        for node in &floor.nodes {
            builder.add_node(node.clone());
        }
    }

    let mut skipped = 0usize;
    for (path, floor) in &floors {
        for pair in &floor.edges {
            let [a, b] = pair.as_slice() else {
                warn!(
                    campus,
                    file = %path.display(),
                    edge = ?pair,
                    "edge is not a pair of ids; skipping"
                );
                skipped += 1;
                continue;
            };
            if !builder.add_edge(a, b) {
                warn!(
                    campus,
                    file = %path.display(),
                    from = %a,
                    to = %b,
                    "edge references unknown node; skipping"
                );
                skipped += 1;
            }
        }
    }

    let graph = builder.build();
    debug!(
        campus,
        files = files.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        skipped,
        "campus graph built"
    );
    Ok(graph)
}

fn read_floor_file(path: &Path) -> Result<FloorFile> {
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|err| Error::InvalidGraphData {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

/// Recursively collect `*.json` files, sorted for deterministic load order.
fn collect_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "json")
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}
