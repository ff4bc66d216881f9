//! `weather` handler: current conditions and the walking verdict.

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;

use campusnav_cli::output::{render_json, render_weather};
use campusnav_lib::{CampusDirectory, LatLng, OpenMeteoClient, WeatherProvider, WeatherSnapshot};

use super::CommandContext;

#[derive(Args, Debug, Clone)]
pub struct WeatherArgs {
    /// Coordinate as `lat,lng`.
    #[arg(long, conflicts_with = "campus")]
    pub at: Option<LatLng>,
    /// Use the reference point of a campus instead of a coordinate.
    #[arg(long)]
    pub campus: Option<String>,
}

#[derive(Serialize)]
struct WeatherOutput {
    location: LatLng,
    #[serde(flatten)]
    snapshot: WeatherSnapshot,
    bad_weather: bool,
}

pub fn handle_weather(ctx: &CommandContext, args: &WeatherArgs) -> Result<()> {
    let point = match (&args.at, &args.campus) {
        (Some(point), _) => *point,
        (None, Some(campus)) => {
            let dataset = ctx.load_dataset()?;
            campus_point(&dataset.directory, campus)?
        }
        (None, None) => bail!("pass either --at <lat,lng> or --campus <name>"),
    };

    let client = OpenMeteoClient::new().context("failed to build weather client")?;
    let snapshot = client
        .current_weather(point)
        .with_context(|| format!("failed to fetch weather at {point}"))?;

    if ctx.format.is_text() {
        print!("{}", render_weather(point, &snapshot, &ctx.palette));
        Ok(())
    } else {
        render_json(&WeatherOutput {
            location: point,
            snapshot,
            bad_weather: snapshot.is_bad(),
        })
        .context("failed to write JSON output")
    }
}

fn campus_point(directory: &CampusDirectory, campus: &str) -> Result<LatLng> {
    directory
        .reference_point(campus)
        .with_context(|| format!("unknown campus '{campus}' or it has no exits or entrances"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_campuses_have_reference_points() {
        let directory = CampusDirectory::builtin();
        assert!(campus_point(&directory, "hall").is_ok());
        let err = campus_point(&directory, "nowhere").unwrap_err();
        assert!(err.to_string().contains("unknown campus 'nowhere'"));
    }
}
