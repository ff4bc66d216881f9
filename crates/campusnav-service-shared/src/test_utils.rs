//! Fixtures for handler tests.
//!
//! The state is built from the checked-in `docs/fixtures/campus` data with
//! in-process collaborators, so no test touches the network.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use campusnav_lib::{
    ensure_dataset, LatLng, OutdoorDirections, OutdoorRoute, Result as LibResult, RoutingConfig,
    TravelMode, WeatherProvider, WeatherSnapshot,
};

use crate::state::AppState;

pub const TEST_FIXTURE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../docs/fixtures/campus");

/// Campus and node identifiers present in the fixture.
pub mod fixture_nodes {
    pub const HALL: &str = "hall";
    pub const MB: &str = "mb";
    pub const H2_209: &str = "h2_209";
    pub const H2_260: &str = "h2_260";
    pub const H1_110: &str = "h1_110";
    pub const MB1_101: &str = "mb1_101";
}

/// Outdoor provider that answers every request with a straight route of
/// fixed length.
#[derive(Debug, Clone, Copy)]
pub struct FixedDirections {
    pub distance: f64,
}

impl OutdoorDirections for FixedDirections {
    fn find_outdoor_path(
        &self,
        origin: LatLng,
        destination: LatLng,
        mode: TravelMode,
    ) -> LibResult<OutdoorRoute> {
        Ok(OutdoorRoute {
            mode,
            distance: self.distance,
            duration: self.distance / 1.4,
            steps: Vec::new(),
            coordinates: vec![origin, destination],
        })
    }
}

/// Weather provider that always reports the same conditions.
#[derive(Debug, Clone, Copy)]
pub struct FixedWeather(pub WeatherSnapshot);

impl FixedWeather {
    pub fn clear() -> Self {
        Self(WeatherSnapshot {
            temperature: 18.0,
            precipitation: 0.0,
            weather_code: 1,
            wind_speed: 3.0,
        })
    }

    pub fn snowing() -> Self {
        Self(WeatherSnapshot {
            temperature: -4.0,
            precipitation: 6.0,
            weather_code: 73,
            wind_speed: 14.0,
        })
    }
}

impl WeatherProvider for FixedWeather {
    fn current_weather(&self, _location: LatLng) -> LibResult<WeatherSnapshot> {
        Ok(self.0)
    }
}

pub fn fixture_dir() -> PathBuf {
    PathBuf::from(TEST_FIXTURE_DIR)
}

/// State over the fixture with the given collaborators.
///
/// # Panics
///
/// If the fixture data cannot be loaded.
pub fn test_state_with(
    outdoor: Arc<dyn OutdoorDirections>,
    weather: Option<Arc<dyn WeatherProvider>>,
) -> AppState {
    let config = RoutingConfig::default();
    let dataset = ensure_dataset(Some(&fixture_dir()), &config.cost)
        .unwrap_or_else(|e| panic!("failed to load campus fixture: {}", e));
    AppState::from_components(dataset, config, outdoor, weather)
}

static TEST_STATE: OnceLock<AppState> = OnceLock::new();

/// Shared fixture state: 400 m outdoor legs under clear skies.
pub fn test_state() -> AppState {
    TEST_STATE
        .get_or_init(|| {
            test_state_with(
                Arc::new(FixedDirections { distance: 400.0 }),
                Some(Arc::new(FixedWeather::clear())),
            )
        })
        .clone()
}

/// Unique request ID for assertions on `instance`.
pub fn test_request_id() -> String {
    format!("test-{}", uuid::Uuid::now_v7())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_dir_exists() {
        assert!(fixture_dir().join("campuses.json").exists());
    }

    #[test]
    fn test_state_contains_fixture_campuses() {
        let state = test_state();
        let names: Vec<&str> = state.store().campus_names().collect();
        assert!(names.contains(&fixture_nodes::HALL));
        assert!(names.contains(&fixture_nodes::MB));
        assert!(state.weather().is_some());
    }

    #[test]
    fn test_fixed_weather_presets() {
        assert!(!FixedWeather::clear().0.is_bad());
        assert!(FixedWeather::snowing().0.is_bad());
    }

    #[test]
    fn test_request_id_unique() {
        assert_ne!(test_request_id(), test_request_id());
    }
}
