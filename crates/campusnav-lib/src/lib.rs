//! CampusNav library entry points.
//!
//! This crate loads campus floor plans into weighted graphs and answers
//! routing queries over them: shortest and k-shortest indoor paths, an
//! accessibility-filtered variant, multi-stop routes, and integrated
//! indoor/outdoor routes that take the weather into account. Higher-level
//! consumers (CLI, HTTP service) should only depend on the items exported
//! here instead of reimplementing behavior.

#![deny(warnings)]

pub mod accessibility;
pub mod client;
pub mod config;
pub mod cost;
pub mod dataset;
pub mod directions;
pub mod directory;
pub mod error;
pub mod geo;
pub mod graph;
pub mod integrated;
pub mod loader;
pub mod outdoor;
pub mod path;
pub mod stitch;
pub mod store;
pub mod weather;

pub use accessibility::build_accessibility_subgraph;
pub use config::{CostModel, RoutingConfig};
pub use cost::edge_cost;
pub use dataset::{default_data_dir, ensure_dataset, resolve_data_dir, CampusDataset};
pub use directions::{location_label, Directions};
pub use directory::{AccessPoint, CampusAccess, CampusDirectory, Connector};
pub use error::{Error, LegFailure, Result};
pub use geo::LatLng;
pub use graph::{Graph, GraphBuilder, Node, PoiType};
pub use integrated::{
    IntegratedPath, IntegratedQuery, IntegratedRouter, Location, RouteResult, Segment,
};
pub use loader::{load_campus, load_campuses};
pub use outdoor::{
    directions_from_env, GoogleDirectionsClient, OutdoorDirections, OutdoorRoute, TravelMode,
    UnconfiguredDirections,
};
pub use path::{k_shortest_paths, shortest_path, PathResult};
pub use stitch::{route_through, LegOutcome, MultiDestinationReport};
pub use store::{CampusGraph, CampusGraphStore};
pub use weather::{OpenMeteoClient, WeatherProvider, WeatherSnapshot};
