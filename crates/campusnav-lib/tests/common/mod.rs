//! Shared fixtures and collaborator stubs for integration tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use campusnav_lib::{
    CampusGraphStore, CostModel, Error, LatLng, OutdoorDirections, OutdoorRoute, Result,
    TravelMode, WeatherProvider, WeatherSnapshot,
};

/// Root of the checked-in campus fixtures (`hall` and `mb`).
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/campus")
}

pub fn fixture_store() -> CampusGraphStore {
    CampusGraphStore::load(&fixtures_dir(), &CostModel::default()).expect("fixture campuses load")
}

#[allow(dead_code)]
pub fn clear_sky() -> WeatherSnapshot {
    WeatherSnapshot {
        temperature: 21.0,
        precipitation: 0.0,
        weather_code: 1,
        wind_speed: 2.5,
    }
}

#[allow(dead_code)]
pub fn snowstorm() -> WeatherSnapshot {
    WeatherSnapshot {
        temperature: -9.0,
        precipitation: 4.0,
        weather_code: 75,
        wind_speed: 12.0,
    }
}

/// Outdoor provider returning canned distances per `origin->destination` pair.
#[allow(dead_code)]
pub struct StubDirections {
    distances: HashMap<String, f64>,
    default_distance: Option<f64>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl StubDirections {
    /// Every request succeeds with `distance` metres unless overridden.
    pub fn uniform(distance: f64) -> Self {
        Self {
            distances: HashMap::new(),
            default_distance: Some(distance),
            calls: AtomicUsize::new(0),
        }
    }

    /// Every request fails.
    pub fn failing() -> Self {
        Self {
            distances: HashMap::new(),
            default_distance: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_leg(mut self, origin: LatLng, destination: LatLng, distance: f64) -> Self {
        self.distances
            .insert(format!("{origin}->{destination}"), distance);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OutdoorDirections for StubDirections {
    fn find_outdoor_path(
        &self,
        origin: LatLng,
        destination: LatLng,
        mode: TravelMode,
    ) -> Result<OutdoorRoute> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let distance = self
            .distances
            .get(&format!("{origin}->{destination}"))
            .copied()
            .or(self.default_distance)
            .ok_or_else(|| Error::CollaboratorFailure {
                provider: "outdoor directions",
                message: "ZERO_RESULTS".to_string(),
            })?;
        Ok(OutdoorRoute {
            mode,
            distance,
            duration: distance / 1.4,
            steps: Vec::new(),
            coordinates: vec![origin, destination],
        })
    }
}

/// Weather provider returning a fixed snapshot and recording where it was asked.
#[allow(dead_code)]
pub struct StubWeather {
    snapshot: Option<WeatherSnapshot>,
    pub requests: Mutex<Vec<LatLng>>,
}

#[allow(dead_code)]
impl StubWeather {
    pub fn reporting(snapshot: WeatherSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            snapshot: None,
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl WeatherProvider for StubWeather {
    fn current_weather(&self, location: LatLng) -> Result<WeatherSnapshot> {
        self.requests.lock().expect("lock").push(location);
        self.snapshot.ok_or_else(|| Error::CollaboratorFailure {
            provider: "weather",
            message: "service unavailable".to_string(),
        })
    }
}
