//! `route-through` handler: visit several stops in order.

use anyhow::{Context, Result};
use clap::Args;

use campusnav_cli::output::{render_json, render_report};
use campusnav_lib::route_through;

use super::CommandContext;

#[derive(Args, Debug, Clone)]
pub struct RouteThroughArgs {
    #[arg(long)]
    pub campus: String,
    /// Starting node id.
    #[arg(long)]
    pub from: String,
    /// Stops in visiting order; repeat the flag for each stop.
    #[arg(long = "stop", required = true)]
    pub stops: Vec<String>,
    #[arg(long)]
    pub accessible: bool,
}

/// Render every leg, then fail if any leg could not be routed.
pub fn handle_route_through(ctx: &CommandContext, args: &RouteThroughArgs) -> Result<()> {
    let dataset = ctx.load_dataset()?;
    let graph = dataset.store.graph_for(&args.campus, args.accessible)?;
    let report = route_through(graph, &args.from, &args.stops);

    if ctx.format.is_text() {
        print!("{}", render_report(&report, &ctx.palette));
    } else {
        render_json(&report).context("failed to write JSON output")?;
    }

    report
        .into_path()
        .context("some stops could not be reached")?;
    Ok(())
}
