//! `campuses` handler: list what the data directory provides.

use anyhow::{Context, Result};
use serde::Serialize;

use campusnav_cli::output::{render_campuses, render_json, CampusSummary, ConnectorSummary};
use campusnav_lib::AccessPoint;

use super::CommandContext;

#[derive(Serialize)]
struct CampusesOutput {
    data_dir: String,
    campuses: Vec<CampusSummary>,
    connectors: Vec<ConnectorSummary>,
}

pub fn handle_campuses(ctx: &CommandContext) -> Result<()> {
    let dataset = ctx.load_dataset()?;

    let mut campuses = Vec::with_capacity(dataset.store.len());
    for name in dataset.store.campus_names() {
        let graph = dataset.store.graph_for(name, false)?;
        let ids = |points: &[AccessPoint]| -> Vec<String> {
            points.iter().map(|point| point.id.clone()).collect()
        };
        campuses.push(CampusSummary {
            name: name.to_string(),
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            exits: ids(dataset.directory.exits(name)),
            entrances: ids(dataset.directory.entrances(name)),
        });
    }

    let connectors: Vec<ConnectorSummary> = dataset
        .directory
        .connectors()
        .iter()
        .map(|connector| ConnectorSummary {
            from: format!("{}:{}", connector.from_campus, connector.from_node),
            to: format!("{}:{}", connector.to_campus, connector.to_node),
            distance: connector.distance,
        })
        .collect();

    if ctx.format.is_text() {
        println!("Campus data: {}", dataset.root.display());
        print!("{}", render_campuses(&campuses, &connectors));
        Ok(())
    } else {
        render_json(&CampusesOutput {
            data_dir: dataset.root.display().to_string(),
            campuses,
            connectors,
        })
        .context("failed to write JSON output")
    }
}
