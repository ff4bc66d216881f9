mod commands;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use campusnav_cli::output::{print_footer, print_logo, OutputFormat};
use campusnav_cli::terminal::ColorPalette;
use campusnav_lib::RoutingConfig;

use commands::integrated::{handle_integrated, IntegratedArgs};
use commands::path::{handle_k_paths, handle_path, KPathsArgs, PathArgs};
use commands::route_through::{handle_route_through, RouteThroughArgs};
use commands::weather::{handle_weather, WeatherArgs};
use commands::CommandContext;

#[derive(Parser, Debug)]
#[command(author, version, about = "CampusNav campus routing tools")]
struct Cli {
    /// Campus data directory (overrides CAMPUSNAV_DATA_DIR).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Suppress the banner and timing footer.
    #[arg(long, global = true)]
    no_logo: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Shortest indoor path between two nodes of one campus.
    Path(PathArgs),
    /// Several alternative indoor paths, best first.
    KPaths(KPathsArgs),
    /// Visit a list of stops in order inside one campus.
    RouteThrough(RouteThroughArgs),
    /// Route across campuses and streets, taking the weather into account.
    Integrated(IntegratedArgs),
    /// Current weather at a coordinate or campus.
    Weather(WeatherArgs),
    /// List loaded campuses, their access points and connectors.
    Campuses,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let started = Instant::now();

    let ctx = CommandContext {
        data_dir: cli.data_dir,
        format: cli.format,
        palette: ColorPalette::detect(),
        config: RoutingConfig::from_env().context("invalid routing configuration")?,
    };
    let decorate = ctx.format.is_text() && !cli.no_logo;
    if decorate {
        print_logo(&ctx.palette);
    }

    match &cli.command {
        Command::Path(args) => handle_path(&ctx, args),
        Command::KPaths(args) => handle_k_paths(&ctx, args),
        Command::RouteThrough(args) => handle_route_through(&ctx, args),
        Command::Integrated(args) => handle_integrated(&ctx, args),
        Command::Weather(args) => handle_weather(&ctx, args),
        Command::Campuses => commands::campuses::handle_campuses(&ctx),
    }?;

    if decorate {
        print_footer(&ctx.palette, started.elapsed());
    }
    Ok(())
}

/// Logs go to stderr so stdout stays parseable; `RUST_LOG` overrides the `info` default.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
