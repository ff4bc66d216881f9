//! Routing configuration.
//!
//! Every tunable constant used by the engine lives here with its default
//! value. Binaries build a [`RoutingConfig`] once at startup, usually through
//! [`RoutingConfig::from_env`], and pass it down by reference.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const SCALE_FACTOR_ENV: &str = "CAMPUSNAV_SCALE_FACTOR";
pub const ELEVATOR_COST_ENV: &str = "CAMPUSNAV_ELEVATOR_COST";
pub const ESCALATOR_COST_ENV: &str = "CAMPUSNAV_ESCALATOR_COST";
pub const ESCALATOR_BIAS_ENV: &str = "CAMPUSNAV_ESCALATOR_BIAS";
pub const STAIRS_COST_ENV: &str = "CAMPUSNAV_STAIRS_COST";
pub const STAIRS_BIAS_ENV: &str = "CAMPUSNAV_STAIRS_BIAS";
pub const BAD_WEATHER_TOLERANCE_ENV: &str = "CAMPUSNAV_BAD_WEATHER_TOLERANCE";
pub const TUNNEL_DISTANCE_ENV: &str = "CAMPUSNAV_TUNNEL_DISTANCE";
pub const WALKING_SPEED_ENV: &str = "CAMPUSNAV_WALKING_SPEED";

/// Constants that turn a pair of adjacent nodes into an edge `(weight, distance)`.
///
/// Distances are in metres. Vertical-transit costs are flat per floor change;
/// the bias multipliers only affect `weight`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    /// Metres per drawing unit for walking edges.
    pub scale_factor: f64,
    pub elevator_cost: f64,
    pub escalator_cost: f64,
    pub escalator_bias: f64,
    pub stairs_cost: f64,
    pub stairs_bias: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            scale_factor: 0.005,
            elevator_cost: 3.0,
            escalator_cost: 5.0,
            escalator_bias: 1.2,
            stairs_cost: 8.0,
            stairs_bias: 1.5,
        }
    }
}

/// Engine-wide routing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    pub cost: CostModel,
    /// Relative band within which bad weather prefers less outdoor exposure
    /// over a shorter total (0.2 = 20%).
    pub bad_weather_tolerance: f64,
    /// Distance in metres reported for a connector segment when the
    /// connector itself does not declare one.
    pub tunnel_distance: f64,
    /// Walking speed in metres per second, used for time estimates.
    pub walking_speed: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            cost: CostModel::default(),
            bad_weather_tolerance: 0.2,
            tunnel_distance: 150.0,
            walking_speed: 1.4,
        }
    }
}

impl RoutingConfig {
    /// Build a configuration from the defaults overridden by any
    /// `CAMPUSNAV_*` environment variables that are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`RoutingConfig::from_env`] but reads values through `lookup`,
    /// so callers (and tests) can supply their own source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let cost = &mut config.cost;
        override_value(&lookup, SCALE_FACTOR_ENV, &mut cost.scale_factor)?;
        override_value(&lookup, ELEVATOR_COST_ENV, &mut cost.elevator_cost)?;
        override_value(&lookup, ESCALATOR_COST_ENV, &mut cost.escalator_cost)?;
        override_value(&lookup, ESCALATOR_BIAS_ENV, &mut cost.escalator_bias)?;
        override_value(&lookup, STAIRS_COST_ENV, &mut cost.stairs_cost)?;
        override_value(&lookup, STAIRS_BIAS_ENV, &mut cost.stairs_bias)?;
        override_value(
            &lookup,
            BAD_WEATHER_TOLERANCE_ENV,
            &mut config.bad_weather_tolerance,
        )?;
        override_value(&lookup, TUNNEL_DISTANCE_ENV, &mut config.tunnel_distance)?;
        override_value(&lookup, WALKING_SPEED_ENV, &mut config.walking_speed)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make routing meaningless.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            (SCALE_FACTOR_ENV, self.cost.scale_factor),
            (ELEVATOR_COST_ENV, self.cost.elevator_cost),
            (ESCALATOR_COST_ENV, self.cost.escalator_cost),
            (ESCALATOR_BIAS_ENV, self.cost.escalator_bias),
            (STAIRS_COST_ENV, self.cost.stairs_cost),
            (STAIRS_BIAS_ENV, self.cost.stairs_bias),
            (TUNNEL_DISTANCE_ENV, self.tunnel_distance),
            (WALKING_SPEED_ENV, self.walking_speed),
        ];
        for (key, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(key, value));
            }
        }
        if !self.bad_weather_tolerance.is_finite() || self.bad_weather_tolerance < 0.0 {
            return Err(invalid(
                BAD_WEATHER_TOLERANCE_ENV,
                self.bad_weather_tolerance,
            ));
        }
        Ok(())
    }
}

fn override_value<F, T>(lookup: &F, key: &str, slot: &mut T) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(raw) = lookup(key) {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(());
        }
        *slot = trimmed.parse().map_err(|_| Error::InvalidConfig {
            key: key.to_string(),
            value: raw.clone(),
        })?;
    }
    Ok(())
}

fn invalid(key: &str, value: f64) -> Error {
    Error::InvalidConfig {
        key: key.to_string(),
        value: value.to_string(),
    }
}
