//! Tunable simulation parameters.
//!
//! Every field has a default from [`crate::constants`]; a JSON file only needs
//! to name the fields it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::ApproachModel;
use crate::error::ConfigError;
use crate::types::Position;

/// Course perturbation applied to live targets each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Turbulence {
    pub enabled: bool,
    /// Largest yaw change per tick (degrees).
    pub max_turn_deg: f64,
    /// Course elevation bound (degrees).
    pub max_elevation_deg: f64,
}

impl Default for Turbulence {
    fn default() -> Self {
        Self {
            enabled: true,
            max_turn_deg: DEFAULT_MAX_TURN_DEG,
            max_elevation_deg: DEFAULT_MAX_ELEVATION_DEG,
        }
    }
}

impl Turbulence {
    /// No course changes at all.
    pub fn off() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed. Same seed = same simulation. `None` seeds from entropy.
    pub seed: Option<u64>,
    pub sensor_position: Position,
    /// Radar detection range (meters).
    pub sensor_range: f64,
    /// Radius of the spawn sphere around the sensor (meters).
    pub spawn_range: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub max_targets: usize,
    /// Targets spawned before the first tick.
    pub initial_targets: usize,
    pub spawn_probability: f64,
    pub hit_probability: f64,
    pub grace_ticks: u32,
    pub min_threat: f64,
    pub fire_delay_ticks: u32,
    /// Wall-clock cadence of the driver loop.
    pub tick_interval_ms: u64,
    /// Simulated seconds per tick.
    pub time_step_secs: f64,
    pub prediction_interval_secs: f64,
    pub approach_model: ApproachModel,
    pub signal_noise: f64,
    pub turbulence: Turbulence,
    /// When set, targets bounce off an axis-aligned box of this half-extent.
    pub arena_half_extent: Option<f64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            sensor_position: Position::ORIGIN,
            sensor_range: DEFAULT_SENSOR_RANGE,
            spawn_range: DEFAULT_SENSOR_RANGE,
            min_speed: DEFAULT_MIN_SPEED,
            max_speed: DEFAULT_MAX_SPEED,
            max_targets: DEFAULT_MAX_TARGETS,
            initial_targets: 0,
            spawn_probability: DEFAULT_SPAWN_PROBABILITY,
            hit_probability: DEFAULT_HIT_PROBABILITY,
            grace_ticks: DEFAULT_GRACE_TICKS,
            min_threat: DEFAULT_MIN_THREAT,
            fire_delay_ticks: DEFAULT_FIRE_DELAY_TICKS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            time_step_secs: DEFAULT_TIME_STEP_SECS,
            prediction_interval_secs: DEFAULT_PREDICTION_INTERVAL_SECS,
            approach_model: ApproachModel::default(),
            signal_noise: DEFAULT_SIGNAL_NOISE,
            turbulence: Turbulence::default(),
            arena_half_extent: None,
        }
    }
}

impl SimConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check every field for values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("sensor_range", self.sensor_range)?;
        positive("spawn_range", self.spawn_range)?;
        positive("time_step_secs", self.time_step_secs)?;
        positive("prediction_interval_secs", self.prediction_interval_secs)?;
        if let Some(extent) = self.arena_half_extent {
            positive("arena_half_extent", extent)?;
        }

        if !(self.min_speed >= 0.0 && self.min_speed.is_finite()) {
            return Err(ConfigError::NotPositive {
                name: "min_speed",
                value: self.min_speed,
            });
        }
        if !self.max_speed.is_finite() || self.min_speed > self.max_speed {
            return Err(ConfigError::InvalidSpeedRange {
                min: self.min_speed,
                max: self.max_speed,
            });
        }

        probability("spawn_probability", self.spawn_probability)?;
        probability("hit_probability", self.hit_probability)?;
        probability("signal_noise", self.signal_noise)?;

        if !(0.0..=180.0).contains(&self.turbulence.max_turn_deg) {
            return Err(ConfigError::NotPositive {
                name: "turbulence.max_turn_deg",
                value: self.turbulence.max_turn_deg,
            });
        }
        if !(0.0..=90.0).contains(&self.turbulence.max_elevation_deg) {
            return Err(ConfigError::NotPositive {
                name: "turbulence.max_elevation_deg",
                value: self.turbulence.max_elevation_deg,
            });
        }

        if !(0.0..=THREAT_MAX).contains(&self.min_threat) {
            return Err(ConfigError::InvalidThreshold(self.min_threat));
        }

        if self.max_targets == 0 {
            return Err(ConfigError::Zero("max_targets"));
        }
        if self.grace_ticks == 0 {
            return Err(ConfigError::Zero("grace_ticks"));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Zero("tick_interval_ms"));
        }
        if self.initial_targets > self.max_targets {
            return Err(ConfigError::TooManyInitialTargets {
                initial: self.initial_targets,
                max: self.max_targets,
            });
        }
        Ok(())
    }

    /// Distance beyond which targets are dropped as having left the area.
    pub fn removal_range(&self) -> f64 {
        self.sensor_range * RANGE_SLACK
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}
