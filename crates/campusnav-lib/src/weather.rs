//! Weather snapshots and the weather provider boundary.

use std::ops::RangeInclusive;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::build_client;
use crate::error::{Error, Result};
use crate::geo::LatLng;

const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";
const PROVIDER: &str = "weather";

/// Precipitation above this many millimetres counts as bad weather.
pub const PRECIPITATION_LIMIT_MM: f64 = 1.0;
/// Temperatures below this many degrees Celsius count as bad weather.
pub const FREEZING_POINT_C: f64 = 0.0;
/// Wind above this many metres per second counts as bad weather.
pub const WIND_LIMIT_MS: f64 = 20.0;

/// WMO weather codes treated as adverse: freezing drizzle, rain and freezing
/// rain, snow, rain showers, snow showers, thunderstorms.
pub const ADVERSE_WEATHER_CODES: [RangeInclusive<u16>; 6] =
    [56..=57, 61..=67, 71..=77, 80..=82, 85..=86, 95..=99];

/// Current conditions at a location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Air temperature in degrees Celsius.
    pub temperature: f64,
    /// Precipitation in millimetres.
    pub precipitation: f64,
    /// WMO weather interpretation code.
    pub weather_code: u16,
    /// Wind speed in metres per second.
    pub wind_speed: f64,
}

impl WeatherSnapshot {
    /// Conditions that make outdoor walking undesirable.
    pub fn is_bad(&self) -> bool {
        self.precipitation > PRECIPITATION_LIMIT_MM
            || is_adverse_code(self.weather_code)
            || self.temperature < FREEZING_POINT_C
            || self.wind_speed > WIND_LIMIT_MS
    }
}

pub fn is_adverse_code(code: u16) -> bool {
    ADVERSE_WEATHER_CODES.iter().any(|range| range.contains(&code))
}

/// Source of current weather conditions.
pub trait WeatherProvider: Send + Sync {
    fn current_weather(&self, location: LatLng) -> Result<WeatherSnapshot>;
}

/// [`WeatherProvider`] backed by the Open-Meteo forecast API.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            base_url: OPEN_METEO_URL.to_string(),
        })
    }

    /// Point the client at a different endpoint (self-hosted instance or test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl WeatherProvider for OpenMeteoClient {
    fn current_weather(&self, location: LatLng) -> Result<WeatherSnapshot> {
        debug!(%location, "requesting current weather");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", location.lat.to_string()),
                ("longitude", location.lng.to_string()),
                (
                    "current",
                    "temperature_2m,precipitation,weather_code,wind_speed_10m".to_string(),
                ),
                ("wind_speed_unit", "ms".to_string()),
            ])
            .send()
            .map_err(|err| Error::collaborator(PROVIDER, err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::collaborator(PROVIDER, format!("HTTP {status}")));
        }
        let body = response
            .text()
            .map_err(|err| Error::collaborator(PROVIDER, err.to_string()))?;
        parse_open_meteo(&body)
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temperature_2m: f64,
    precipitation: f64,
    weather_code: u16,
    wind_speed_10m: f64,
}

/// Parse the body of an Open-Meteo `current=` forecast response.
pub fn parse_open_meteo(body: &str) -> Result<WeatherSnapshot> {
    let parsed: ForecastResponse = serde_json::from_str(body)
        .map_err(|err| Error::collaborator(PROVIDER, format!("unexpected response: {err}")))?;
    let current = parsed.current;
    Ok(WeatherSnapshot {
        temperature: current.temperature_2m,
        precipitation: current.precipitation,
        weather_code: current.weather_code,
        wind_speed: current.wind_speed_10m,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear() -> WeatherSnapshot {
        WeatherSnapshot {
            temperature: 18.0,
            precipitation: 0.0,
            weather_code: 1,
            wind_speed: 3.0,
        }
    }

    #[test]
    fn clear_day_is_not_bad() {
        assert!(!clear().is_bad());
    }

    #[test]
    fn each_threshold_triggers_bad_weather() {
        let wet = WeatherSnapshot {
            precipitation: 1.5,
            ..clear()
        };
        let cold = WeatherSnapshot {
            temperature: -4.0,
            ..clear()
        };
        let windy = WeatherSnapshot {
            wind_speed: 22.0,
            ..clear()
        };
        let snowing = WeatherSnapshot {
            weather_code: 73,
            ..clear()
        };
        for snapshot in [wet, cold, windy, snowing] {
            assert!(snapshot.is_bad(), "{snapshot:?} should be bad weather");
        }
    }

    #[test]
    fn thresholds_are_exclusive() {
        let edge = WeatherSnapshot {
            temperature: 0.0,
            precipitation: 1.0,
            wind_speed: 20.0,
            ..clear()
        };
        assert!(!edge.is_bad());
    }

    #[test]
    fn adverse_codes() {
        for code in [56, 61, 67, 71, 77, 80, 82, 85, 86, 95, 99] {
            assert!(is_adverse_code(code), "code {code}");
        }
        for code in [0, 1, 2, 3, 45, 48, 51, 53, 55, 68, 79, 83, 90] {
            assert!(!is_adverse_code(code), "code {code}");
        }
    }

    #[test]
    fn parses_open_meteo_body() {
        let body = r#"{
            "latitude": 45.5, "longitude": -73.6,
            "current_units": {"wind_speed_10m": "m/s"},
            "current": {"time": "2026-01-14T09:00", "interval": 900,
                        "temperature_2m": -7.3, "precipitation": 0.2,
                        "weather_code": 71, "wind_speed_10m": 5.4}
        }"#;
        let snapshot = parse_open_meteo(body).unwrap();
        assert_eq!(snapshot.temperature, -7.3);
        assert_eq!(snapshot.weather_code, 71);
        assert!(snapshot.is_bad());
    }

    #[test]
    fn missing_fields_are_collaborator_failures() {
        let err = parse_open_meteo(r#"{"current": {"temperature_2m": 3.0}}"#).unwrap_err();
        assert!(err.is_collaborator());
    }
}
