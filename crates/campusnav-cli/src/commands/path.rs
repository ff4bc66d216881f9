//! `path` and `k-paths` handlers for single-campus indoor routing.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use campusnav_cli::output::{render_directions, render_json, render_k_paths, render_path};
use campusnav_lib::{k_shortest_paths, shortest_path, Directions, PathResult};

use super::CommandContext;

/// Arguments for the `path` subcommand.
#[derive(Args, Debug, Clone)]
pub struct PathArgs {
    /// Campus whose graph is searched.
    #[arg(long)]
    pub campus: String,
    /// Starting node id.
    #[arg(long)]
    pub from: String,
    /// Destination node id.
    #[arg(long)]
    pub to: String,
    /// Avoid stairs and escalators.
    #[arg(long)]
    pub accessible: bool,
    /// Also print step-by-step walking directions.
    #[arg(long)]
    pub directions: bool,
}

/// Arguments for the `k-paths` subcommand.
#[derive(Args, Debug, Clone)]
pub struct KPathsArgs {
    #[arg(long)]
    pub campus: String,
    #[arg(long)]
    pub from: String,
    #[arg(long)]
    pub to: String,
    /// Number of alternatives to return.
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u16).range(1..=50))]
    pub k: u16,
    #[arg(long)]
    pub accessible: bool,
}

#[derive(Serialize)]
struct PathOutput<'a> {
    #[serde(flatten)]
    path: &'a PathResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    directions: Option<Directions>,
}

pub fn handle_path(ctx: &CommandContext, args: &PathArgs) -> Result<()> {
    let dataset = ctx.load_dataset()?;
    let graph = dataset.store.graph_for(&args.campus, args.accessible)?;
    let path = shortest_path(graph, &args.from, &args.to)
        .with_context(|| format!("failed to route from {} to {}", args.from, args.to))?;
    let directions = args
        .directions
        .then(|| Directions::for_path(&path, ctx.config.walking_speed));

    if ctx.format.is_text() {
        print!("{}", render_path(&path, &ctx.palette));
        if let Some(directions) = &directions {
            println!();
            print!("{}", render_directions(directions));
        }
        Ok(())
    } else {
        render_json(&PathOutput {
            path: &path,
            directions,
        })
        .context("failed to write JSON output")
    }
}

pub fn handle_k_paths(ctx: &CommandContext, args: &KPathsArgs) -> Result<()> {
    let dataset = ctx.load_dataset()?;
    let graph = dataset.store.graph_for(&args.campus, args.accessible)?;
    let paths = k_shortest_paths(graph, &args.from, &args.to, usize::from(args.k))
        .with_context(|| format!("failed to route from {} to {}", args.from, args.to))?;

    if ctx.format.is_text() {
        print!("{}", render_k_paths(&paths, &ctx.palette));
        Ok(())
    } else {
        render_json(&paths).context("failed to write JSON output")
    }
}
