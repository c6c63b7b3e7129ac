//! Radar scanner.
//!
//! Each scan computes one reading per live target inside the sensor range.
//! The per-target work is independent and runs on rayon; random noise is
//! drawn up front in id order so a seeded run reproduces exactly.

use std::collections::HashMap;

use rand::Rng;
use rayon::prelude::*;

use airdefense_core::config::SimConfig;
use airdefense_core::constants::*;
use airdefense_core::enums::ApproachModel;
use airdefense_core::error::{Result, SimError};
use airdefense_core::state::{RadarReading, TargetView};
use airdefense_core::types::Position;

use super::scoring;

#[derive(Debug, Clone)]
pub struct RadarScanner {
    position: Position,
    range: f64,
    noise: f64,
    prediction_interval_secs: f64,
    /// Simulated time between consecutive scans.
    scan_interval_secs: f64,
    approach_model: ApproachModel,
    /// Where each live target was at the previous scan.
    previous_positions: HashMap<u32, Position>,
}

impl RadarScanner {
    pub fn new(position: Position, range: f64) -> Self {
        Self {
            position,
            range,
            noise: DEFAULT_SIGNAL_NOISE,
            prediction_interval_secs: DEFAULT_PREDICTION_INTERVAL_SECS,
            scan_interval_secs: DEFAULT_TIME_STEP_SECS,
            approach_model: ApproachModel::default(),
            previous_positions: HashMap::new(),
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            noise: config.signal_noise,
            prediction_interval_secs: config.prediction_interval_secs,
            scan_interval_secs: config.time_step_secs,
            approach_model: config.approach_model,
            ..Self::new(config.sensor_position, config.sensor_range)
        }
    }

    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    pub fn with_approach_model(mut self, model: ApproachModel) -> Self {
        self.approach_model = model;
        self
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn range(&self) -> f64 {
        self.range
    }

    /// Scan `targets` and return readings in ascending target id order.
    ///
    /// Destroyed targets and targets beyond range produce no reading. The
    /// previous-position cache is refreshed only when the scan succeeds.
    pub fn scan<R: Rng + ?Sized>(
        &mut self,
        targets: &[TargetView],
        rng: &mut R,
    ) -> Result<Vec<RadarReading>> {
        let mut visible: Vec<&TargetView> = targets
            .iter()
            .filter(|t| !t.is_destroyed && self.position.range_to(&t.position) <= self.range)
            .collect();
        visible.sort_by_key(|t| t.id);

        let noises: Vec<f64> = visible.iter().map(|_| self.draw_noise(rng)).collect();

        let this = &*self;
        let readings: Vec<RadarReading> = visible
            .par_iter()
            .zip(noises)
            .map(|(target, noise)| this.read(target, noise))
            .collect();

        if let Some(bad) = readings
            .iter()
            .find(|r| !r.distance.is_finite() || !r.predicted_distance.is_finite())
        {
            return Err(SimError::NonFiniteReading {
                target_id: bad.target_id,
            });
        }

        self.previous_positions = targets
            .iter()
            .filter(|t| !t.is_destroyed)
            .map(|t| (t.id, t.position))
            .collect();

        Ok(readings)
    }

    fn draw_noise<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.noise > 0.0 {
            rng.gen_range(-self.noise..=self.noise)
        } else {
            0.0
        }
    }

    fn read(&self, target: &TargetView, noise: f64) -> RadarReading {
        let distance = self.position.range_to(&target.position);
        let predicted_distance = self.position.range_to(&self.predicted_position(target));
        RadarReading {
            target_id: target.id,
            distance,
            signal_strength: scoring::signal_strength(distance, self.range, noise),
            threat_level: scoring::threat_level(
                distance,
                predicted_distance,
                target.speed,
                self.range,
                self.prediction_interval_secs,
            ),
            predicted_distance,
        }
    }

    /// Where the target is expected to be after the prediction interval.
    pub fn predicted_position(&self, target: &TargetView) -> Position {
        let velocity = match self.approach_model {
            ApproachModel::Extrapolate => target.velocity,
            ApproachModel::Displacement => match self.previous_positions.get(&target.id) {
                Some(previous) => target.position.velocity_since(previous, self.scan_interval_secs),
                None => return target.position,
            },
        };
        target.position.advanced(&velocity, self.prediction_interval_secs)
    }
}
