//! Application state for the HTTP services.
//!
//! Campus graphs are loaded once at startup and shared read-only between
//! handlers; the only lazily built data are the accessibility subgraphs,
//! which the library guards itself.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use campusnav_lib::{
    directions_from_env, ensure_dataset, CampusDataset, CampusDirectory, CampusGraphStore,
    Error as LibError, IntegratedRouter, OpenMeteoClient, OutdoorDirections, RoutingConfig,
    WeatherProvider,
};

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// The data directory does not exist.
    DataDirNotFound(String),

    /// The campus data could not be loaded.
    DatasetLoad(LibError),

    /// The data directory holds no campus graphs.
    NoCampuses(String),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataDirNotFound(path) => write!(f, "campus data directory not found: {}", path),
            Self::DatasetLoad(e) => write!(f, "failed to load campus data: {}", e),
            Self::NoCampuses(path) => write!(f, "no campus graphs found under {}", path),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DatasetLoad(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for AppStateError {
    fn from(err: LibError) -> Self {
        match err {
            LibError::DataDirNotFound { path } => Self::DataDirNotFound(path.display().to_string()),
            other => Self::DatasetLoad(other),
        }
    }
}

/// Shared application state for all axum handlers.
///
/// Cheap to clone; share it through axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    router: IntegratedRouter,
    weather: Option<Arc<dyn WeatherProvider>>,
    data_dir: PathBuf,
    loaded_at: DateTime<Utc>,
}

impl AppState {
    /// Load campus data from `data_dir` and wire the production collaborators:
    /// Google directions when `GOOGLE_MAPS_API_KEY` is set and Open-Meteo weather.
    ///
    /// With `eager_accessibility` every accessibility subgraph is built before
    /// the state is returned instead of on first use.
    pub fn load(
        data_dir: impl AsRef<Path>,
        config: RoutingConfig,
        eager_accessibility: bool,
    ) -> Result<Self, AppStateError> {
        let data_dir = data_dir.as_ref();
        tracing::info!(path = %data_dir.display(), "loading campus data");
        let dataset = ensure_dataset(Some(data_dir), &config.cost)?;
        if dataset.store.is_empty() {
            return Err(AppStateError::NoCampuses(data_dir.display().to_string()));
        }
        if eager_accessibility {
            dataset.store.warm_accessibility();
            tracing::info!("accessibility subgraphs built");
        }

        let weather: Option<Arc<dyn WeatherProvider>> = match OpenMeteoClient::new() {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                tracing::warn!(error = %e, "weather client unavailable, planning without weather");
                None
            }
        };

        Ok(Self::from_components(
            dataset,
            config,
            directions_from_env(),
            weather,
        ))
    }

    /// Assemble state from an already loaded dataset and explicit collaborators.
    pub fn from_components(
        dataset: CampusDataset,
        config: RoutingConfig,
        outdoor: Arc<dyn OutdoorDirections>,
        weather: Option<Arc<dyn WeatherProvider>>,
    ) -> Self {
        let CampusDataset {
            root,
            store,
            directory,
        } = dataset;
        let mut router = IntegratedRouter::new(store, directory, config, outdoor);
        if let Some(provider) = &weather {
            router = router.with_weather(Arc::clone(provider));
        }
        Self {
            inner: Arc::new(AppStateInner {
                router,
                weather,
                data_dir: root,
                loaded_at: Utc::now(),
            }),
        }
    }

    pub fn router(&self) -> &IntegratedRouter {
        &self.inner.router
    }

    pub fn store(&self) -> &CampusGraphStore {
        self.inner.router.store()
    }

    pub fn directory(&self) -> &CampusDirectory {
        self.inner.router.directory()
    }

    pub fn config(&self) -> &RoutingConfig {
        self.inner.router.config()
    }

    /// The weather provider, if one is configured.
    pub fn weather(&self) -> Option<&Arc<dyn WeatherProvider>> {
        self.inner.weather.as_ref()
    }

    pub fn data_dir(&self) -> &Path {
        &self.inner.data_dir
    }

    /// When the campus data finished loading.
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.inner.loaded_at
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("campus_count", &self.store().len())
            .field("node_count", &self.store().total_nodes())
            .field("live_weather", &self.inner.weather.is_some())
            .field("loaded_at", &self.inner.loaded_at.to_rfc3339())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusnav_lib::{CostModel, UnconfiguredDirections};

    fn fixture_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/campus")
    }

    fn fixture_state() -> AppState {
        let dataset = ensure_dataset(Some(&fixture_dir()), &CostModel::default()).unwrap();
        AppState::from_components(
            dataset,
            RoutingConfig::default(),
            Arc::new(UnconfiguredDirections),
            None,
        )
    }

    #[test]
    fn test_app_state_from_components() {
        let state = fixture_state();
        assert_eq!(state.store().len(), 2);
        assert!(state.directory().connector_between("hall", "mb").is_some());
        assert!(state.weather().is_none());
        assert!(state.loaded_at() <= Utc::now());
    }

    #[test]
    fn test_app_state_clone_shares_router() {
        let state1 = fixture_state();
        let state2 = state1.clone();
        assert!(std::ptr::eq(state1.router(), state2.router()));
    }

    #[test]
    fn test_app_state_debug() {
        let debug = format!("{:?}", fixture_state());
        assert!(debug.contains("AppState"));
        assert!(debug.contains("campus_count: 2"));
        assert!(debug.contains("live_weather: false"));
    }

    #[test]
    fn test_app_state_load_nonexistent() {
        let result = AppState::load(
            "/nonexistent/campus/data",
            RoutingConfig::default(),
            false,
        );
        match result.unwrap_err() {
            AppStateError::DataDirNotFound(path) => assert!(path.contains("nonexistent")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_app_state_error_display() {
        let err = AppStateError::NoCampuses("/srv/campus".to_string());
        assert!(err.to_string().contains("/srv/campus"));
    }
}
