//! `integrated` handler: routes that may leave the building.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use campusnav_cli::output::{render_integrated, render_json};
use campusnav_lib::{
    directions_from_env, IntegratedQuery, IntegratedRouter, Location, OpenMeteoClient,
    TravelMode, WeatherSnapshot,
};

use super::CommandContext;

#[derive(Args, Debug, Clone)]
pub struct IntegratedArgs {
    /// Start as `campus:node` or `lat,lng`.
    #[arg(long)]
    pub from: Location,
    /// Destination as `campus:node` or `lat,lng`.
    #[arg(long)]
    pub to: Location,
    /// Intermediate stop, repeatable.
    #[arg(long = "stop")]
    pub stops: Vec<Location>,
    #[arg(long)]
    pub accessible: bool,
    /// Travel mode requested for outdoor legs.
    #[arg(long, default_value_t = TravelMode::Walking)]
    pub mode: TravelMode,
    /// Where weather conditions come from.
    #[arg(long, value_enum, default_value_t = WeatherSource::Live)]
    pub weather: WeatherSource,
}

/// Weather input for planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WeatherSource {
    /// Query Open-Meteo at the midpoint of the endpoints.
    Live,
    /// Plan as if the weather were unknown.
    Ignore,
    /// Assume mild, dry conditions.
    Good,
    /// Assume a cold, wet storm.
    Bad,
}

impl WeatherSource {
    fn assumed(self) -> Option<WeatherSnapshot> {
        match self {
            WeatherSource::Good => Some(WeatherSnapshot {
                temperature: 18.0,
                precipitation: 0.0,
                weather_code: 1,
                wind_speed: 3.0,
            }),
            WeatherSource::Bad => Some(WeatherSnapshot {
                temperature: -4.0,
                precipitation: 6.0,
                weather_code: 73,
                wind_speed: 14.0,
            }),
            WeatherSource::Live | WeatherSource::Ignore => None,
        }
    }
}

pub fn handle_integrated(ctx: &CommandContext, args: &IntegratedArgs) -> Result<()> {
    let dataset = ctx.load_dataset()?;
    let mut router = IntegratedRouter::new(
        dataset.store,
        dataset.directory,
        ctx.config,
        directions_from_env(),
    );

    let query = IntegratedQuery::new(args.from.clone(), args.to.clone())
        .with_stops(args.stops.clone())
        .accessible(args.accessible)
        .with_mode(args.mode);

    let planned = match args.weather {
        WeatherSource::Live => {
            let client = OpenMeteoClient::new().context("failed to build weather client")?;
            router = router.with_weather(Arc::new(client));
            router.plan_with_live_weather(&query)
        }
        source => router.plan(&query, source.assumed().as_ref()),
    }
    .with_context(|| format!("failed to plan a route from {} to {}", args.from, args.to))?;

    if ctx.format.is_text() {
        print!("{}", render_integrated(&planned, &ctx.palette));
        Ok(())
    } else {
        render_json(&planned).context("failed to write JSON output")
    }
}
