//! Integrated indoor/outdoor route planning.
//!
//! This module provides:
//! - [`Location`] - An indoor node or an outdoor coordinate
//! - [`IntegratedQuery`] - Endpoints, optional stops, accessibility and travel mode
//! - [`IntegratedRouter`] - Plans routes across campuses, tunnels and streets
//! - [`Segment`], [`IntegratedPath`], [`RouteResult`] - Planning results
//!
//! Indoor legs run on the campus graphs in a [`CampusGraphStore`]; outdoor
//! legs are delegated to an [`OutdoorDirections`] provider. When the weather
//! is bad and two campuses share a connector, the tunnel is taken without
//! consulting the outdoor provider. Otherwise every exit/entrance pair is
//! tried and the best complete candidate wins.

mod candidate;
mod segment;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::RoutingConfig;
use crate::directory::{AccessPoint, CampusDirectory, Connector};
use crate::error::{Error, Result};
use crate::geo::LatLng;
use crate::outdoor::{OutdoorDirections, TravelMode};
use crate::path::shortest_path;
use crate::store::CampusGraphStore;
use crate::weather::{WeatherProvider, WeatherSnapshot};

use candidate::{Candidate, CandidateSelector};

pub use segment::{IntegratedPath, RouteResult, Segment};

/// A route endpoint or stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Location {
    /// A node of a campus graph.
    Indoor { campus: String, id: String },
    /// A street coordinate.
    Outdoor(LatLng),
}

impl Location {
    pub fn indoor(campus: impl Into<String>, id: impl Into<String>) -> Self {
        Location::Indoor {
            campus: campus.into(),
            id: id.into(),
        }
    }

    pub fn outdoor(lat: f64, lng: f64) -> Self {
        Location::Outdoor(LatLng::new(lat, lng))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Indoor { campus, id } => write!(f, "{campus}:{id}"),
            Location::Outdoor(point) => write!(f, "{point}"),
        }
    }
}

/// Parses `campus:node` as an indoor location and `lat,lng` as an outdoor one.
impl FromStr for Location {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((campus, id)) = s.split_once(':') {
            let (campus, id) = (campus.trim(), id.trim());
            if campus.is_empty() || id.is_empty() {
                return Err(format!("expected 'campus:node', got '{s}'"));
            }
            return Ok(Location::indoor(campus, id));
        }
        s.parse::<LatLng>()
            .map(Location::Outdoor)
            .map_err(|err| format!("'{s}' is neither 'campus:node' nor 'lat,lng' ({err})"))
    }
}

/// A request for an integrated route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegratedQuery {
    pub start: Location,
    #[serde(default)]
    pub stops: Vec<Location>,
    pub end: Location,
    /// Avoid stairs and escalators on every indoor leg.
    #[serde(default)]
    pub accessible: bool,
    #[serde(default)]
    pub mode: TravelMode,
}

impl IntegratedQuery {
    pub fn new(start: Location, end: Location) -> Self {
        Self {
            start,
            stops: Vec::new(),
            end,
            accessible: false,
            mode: TravelMode::default(),
        }
    }

    pub fn with_stops(mut self, stops: Vec<Location>) -> Self {
        self.stops = stops;
        self
    }

    pub fn accessible(mut self, accessible: bool) -> Self {
        self.accessible = accessible;
        self
    }

    pub fn with_mode(mut self, mode: TravelMode) -> Self {
        self.mode = mode;
        self
    }

    /// Start, stops and end in travel order.
    pub fn waypoints(&self) -> Vec<&Location> {
        std::iter::once(&self.start)
            .chain(self.stops.iter())
            .chain(std::iter::once(&self.end))
            .collect()
    }

    /// `(campus, start, end)` when the query is a plain single-campus walk.
    fn single_campus(&self) -> Option<(&str, &str, &str)> {
        match (&self.start, &self.end) {
            (
                Location::Indoor { campus, id: start },
                Location::Indoor {
                    campus: end_campus,
                    id: end,
                },
            ) if self.stops.is_empty() && campus == end_campus => Some((campus, start, end)),
            _ => None,
        }
    }
}

/// Where a candidate leaves the origin side or reaches the destination side.
#[derive(Debug, Clone, Copy)]
struct Anchor<'a> {
    access: Option<&'a AccessPoint>,
    location: LatLng,
}

/// Plans routes that may combine indoor walks, tunnels and outdoor legs.
#[derive(Clone)]
pub struct IntegratedRouter {
    store: CampusGraphStore,
    directory: Arc<CampusDirectory>,
    config: RoutingConfig,
    outdoor: Arc<dyn OutdoorDirections>,
    weather: Option<Arc<dyn WeatherProvider>>,
}

impl fmt::Debug for IntegratedRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegratedRouter")
            .field("campuses", &self.store.len())
            .field("config", &self.config)
            .field("live_weather", &self.weather.is_some())
            .finish_non_exhaustive()
    }
}

impl IntegratedRouter {
    pub fn new(
        store: CampusGraphStore,
        directory: CampusDirectory,
        config: RoutingConfig,
        outdoor: Arc<dyn OutdoorDirections>,
    ) -> Self {
        Self {
            store,
            directory: Arc::new(directory),
            config,
            outdoor,
            weather: None,
        }
    }

    pub fn with_weather(mut self, provider: Arc<dyn WeatherProvider>) -> Self {
        self.weather = Some(provider);
        self
    }

    pub fn store(&self) -> &CampusGraphStore {
        &self.store
    }

    pub fn directory(&self) -> &CampusDirectory {
        &self.directory
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Plan `query` under the given conditions. Unknown weather is treated as good.
    pub fn plan(
        &self,
        query: &IntegratedQuery,
        weather: Option<&WeatherSnapshot>,
    ) -> Result<IntegratedPath> {
        let waypoints = query.waypoints();
        let mut planned = IntegratedPath::from_segments(Vec::new());
        for pair in waypoints.windows(2) {
            let leg = self.plan_leg(pair[0], pair[1], query, weather)?;
            planned.extend(leg);
        }
        planned.weather = weather.copied();

        info!(
            start = %query.start,
            end = %query.end,
            segments = planned.segments.len(),
            total_distance = planned.total_distance,
            tunnel = planned.uses_tunnel(),
            weather_adjusted = planned.weather_adjusted(),
            "integrated route planned"
        );
        Ok(planned)
    }

    /// Plan `query` after fetching current conditions from the weather provider.
    ///
    /// Single-campus queries never go outside, so no lookup is made for them.
    pub fn plan_with_live_weather(&self, query: &IntegratedQuery) -> Result<IntegratedPath> {
        let snapshot = match query.single_campus() {
            Some(_) => None,
            None => self.current_weather(query),
        };
        self.plan(query, snapshot.as_ref())
    }

    /// Answer `query` as a [`RouteResult`], never failing.
    ///
    /// Single-campus queries without stops produce a simple indoor path.
    pub fn route(&self, query: &IntegratedQuery, weather: Option<&WeatherSnapshot>) -> RouteResult {
        let outcome = match query.single_campus() {
            Some((campus, start, end)) => self
                .store
                .graph_for(campus, query.accessible)
                .and_then(|graph| shortest_path(graph, start, end))
                .map(RouteResult::Simple),
            None => self.plan(query, weather).map(RouteResult::Integrated),
        };
        outcome.unwrap_or_else(RouteResult::from)
    }

    /// Current conditions at the midpoint of the query's endpoints.
    ///
    /// Returns `None` when no provider is configured, no endpoint has a known
    /// coordinate, or the provider fails.
    pub fn current_weather(&self, query: &IntegratedQuery) -> Option<WeatherSnapshot> {
        let provider = self.weather.as_ref()?;
        let point = match (self.coordinate(&query.start), self.coordinate(&query.end)) {
            (Some(a), Some(b)) => a.midpoint(&b),
            (Some(point), None) | (None, Some(point)) => point,
            (None, None) => {
                debug!(start = %query.start, end = %query.end, "no coordinates for weather lookup");
                return None;
            }
        };
        match provider.current_weather(point) {
            Ok(snapshot) => {
                debug!(%point, bad = snapshot.is_bad(), "weather snapshot fetched");
                Some(snapshot)
            }
            Err(err) => {
                warn!(%point, error = %err, "weather lookup failed; planning without weather");
                None
            }
        }
    }

    fn coordinate(&self, location: &Location) -> Option<LatLng> {
        match location {
            Location::Indoor { campus, .. } => self.directory.reference_point(campus),
            Location::Outdoor(point) => Some(*point),
        }
    }

    fn plan_leg(
        &self,
        from: &Location,
        to: &Location,
        query: &IntegratedQuery,
        weather: Option<&WeatherSnapshot>,
    ) -> Result<IntegratedPath> {
        self.check_endpoint(from)?;
        self.check_endpoint(to)?;

        match (from, to) {
            (
                Location::Indoor { campus, id: start },
                Location::Indoor {
                    campus: end_campus,
                    id: end,
                },
            ) if campus == end_campus => {
                let segment = self.indoor_segment(campus, start, end, query.accessible)?;
                Ok(IntegratedPath::from_segments(vec![segment]))
            }
            (Location::Outdoor(origin), Location::Outdoor(destination)) => {
                let route = self
                    .outdoor
                    .find_outdoor_path(*origin, *destination, query.mode)?;
                Ok(IntegratedPath::from_segments(vec![Segment::Outdoor {
                    distance: route.distance,
                    route,
                    weather_adjusted: false,
                }]))
            }
            _ => {
                let bad_weather = weather.is_some_and(WeatherSnapshot::is_bad);
                if bad_weather {
                    if let Some(path) = self.try_tunnel(from, to, query.accessible) {
                        return Ok(path);
                    }
                }
                self.best_candidate(from, to, query, bad_weather)
            }
        }
    }

    /// Fail early on campuses or nodes that do not exist.
    fn check_endpoint(&self, location: &Location) -> Result<()> {
        if let Location::Indoor { campus, id } = location {
            self.store.campus(campus)?.graph().resolve(id)?;
        }
        Ok(())
    }

    fn try_tunnel(
        &self,
        from: &Location,
        to: &Location,
        accessible: bool,
    ) -> Option<IntegratedPath> {
        let (
            Location::Indoor { campus, id: start },
            Location::Indoor {
                campus: end_campus,
                id: end,
            },
        ) = (from, to)
        else {
            return None;
        };
        let connector = self.directory.connector_between(campus, end_campus)?;
        match self.tunnel_route(&connector, start, end, accessible) {
            Ok(path) => {
                debug!(from = %campus, to = %end_campus, "bad weather; routing through connector");
                Some(path)
            }
            Err(err) => {
                warn!(
                    from = %campus,
                    to = %end_campus,
                    error = %err,
                    "connector route failed; falling back to exit candidates"
                );
                None
            }
        }
    }

    fn tunnel_route(
        &self,
        connector: &Connector,
        start: &str,
        end: &str,
        accessible: bool,
    ) -> Result<IntegratedPath> {
        let entry = self.indoor_segment(
            &connector.from_campus,
            start,
            &connector.from_node,
            accessible,
        )?;
        let exit = self.indoor_segment(&connector.to_campus, &connector.to_node, end, accessible)?;
        let tunnel = Segment::Tunnel {
            from_campus: connector.from_campus.clone(),
            from_node: connector.from_node.clone(),
            to_campus: connector.to_campus.clone(),
            to_node: connector.to_node.clone(),
            distance: connector.distance.unwrap_or(self.config.tunnel_distance),
        };
        Ok(IntegratedPath::from_segments(vec![entry, tunnel, exit]))
    }

    fn anchors<'a>(&'a self, location: &'a Location, origin: bool) -> Vec<Anchor<'a>> {
        match location {
            Location::Indoor { campus, .. } => {
                let points = if origin {
                    self.directory.exits(campus)
                } else {
                    self.directory.entrances(campus)
                };
                points
                    .iter()
                    .map(|point| Anchor {
                        access: Some(point),
                        location: point.location,
                    })
                    .collect()
            }
            Location::Outdoor(point) => vec![Anchor {
                access: None,
                location: *point,
            }],
        }
    }

    /// Try every origin-exit × destination-entrance pair and keep the best.
    fn best_candidate(
        &self,
        from: &Location,
        to: &Location,
        query: &IntegratedQuery,
        bad_weather: bool,
    ) -> Result<IntegratedPath> {
        let mut selector = CandidateSelector::new(bad_weather, self.config.bad_weather_tolerance);
        let origins = self.anchors(from, true);
        let destinations = self.anchors(to, false);

        for origin in &origins {
            for destination in &destinations {
                match self.build_candidate(from, to, origin, destination, query) {
                    Ok(candidate) => selector.offer(candidate),
                    Err(err) => debug!(
                        origin = ?origin.access.map(|point| point.id.as_str()),
                        destination = ?destination.access.map(|point| point.id.as_str()),
                        error = %err,
                        "candidate skipped"
                    ),
                }
            }
        }

        let selection = selector.finish().ok_or_else(|| Error::NoValidIntegratedPath {
            start: from.to_string(),
            goal: to.to_string(),
        })?;
        let mut segments = selection.candidate.segments;
        if selection.weather_adjusted {
            for segment in &mut segments {
                if let Segment::Outdoor {
                    weather_adjusted, ..
                } = segment
                {
                    *weather_adjusted = true;
                }
            }
        }
        Ok(IntegratedPath::from_segments(segments))
    }

    fn build_candidate(
        &self,
        from: &Location,
        to: &Location,
        origin: &Anchor<'_>,
        destination: &Anchor<'_>,
        query: &IntegratedQuery,
    ) -> Result<Candidate> {
        let mut segments = Vec::with_capacity(3);

        let last = match (to, destination.access) {
            (Location::Indoor { campus, id }, Some(entrance)) => {
                Some(self.indoor_segment(campus, &entrance.id, id, query.accessible)?)
            }
            _ => None,
        };
        if let (Location::Indoor { campus, id }, Some(exit)) = (from, origin.access) {
            segments.push(self.indoor_segment(campus, id, &exit.id, query.accessible)?);
        }

        let route = self
            .outdoor
            .find_outdoor_path(origin.location, destination.location, query.mode)?;
        segments.push(Segment::Outdoor {
            distance: route.distance,
            route,
            weather_adjusted: false,
        });
        segments.extend(last);

        Ok(Candidate::new(segments))
    }

    fn indoor_segment(
        &self,
        campus: &str,
        start: &str,
        end: &str,
        accessible: bool,
    ) -> Result<Segment> {
        let graph = self.store.graph_for(campus, accessible)?;
        let path = shortest_path(graph, start, end)?;
        Ok(Segment::Indoor {
            campus: campus.to_string(),
            path: path.path,
            distance: path.distance,
        })
    }
}
