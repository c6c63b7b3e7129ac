//! Simulation snapshot: the complete visible state published after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{Position, SimTime, Velocity};

/// Complete simulation state handed to consumers after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    /// All registry targets, ascending by id.
    pub targets: Vec<TargetView>,
    /// This tick's radar readings, ascending by target id.
    pub readings: Vec<RadarReading>,
    pub engagement: EngagementView,
    /// Events raised during this tick, in emission order.
    pub events: Vec<SimEvent>,
}

impl SimSnapshot {
    /// Number of targets not yet destroyed.
    pub fn active_count(&self) -> usize {
        self.targets.iter().filter(|t| !t.is_destroyed).count()
    }

    /// Whether this tick changed anything a display would show: targets moved
    /// or something other than the routine scan summary happened.
    pub fn has_changes(&self) -> bool {
        !self.targets.is_empty()
            || self
                .events
                .iter()
                .any(|e| !matches!(e, SimEvent::ScanSummary { .. }))
    }
}

/// A target as seen from outside the registry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetView {
    pub id: u32,
    pub position: Position,
    pub velocity: Velocity,
    /// Speed magnitude used for threat scoring (m/s).
    pub speed: f64,
    pub is_destroyed: bool,
    /// Ticks left before a destroyed target is removed (0 while alive).
    pub grace_remaining: u32,
}

/// One target's sensor observation for a single scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarReading {
    pub target_id: u32,
    /// Range from the sensor (meters).
    pub distance: f64,
    /// 0.0 - 1.0.
    pub signal_strength: f64,
    /// 0.0 - 100.0.
    pub threat_level: f64,
    /// Range from the sensor after the prediction interval (meters).
    pub predicted_distance: f64,
}

impl RadarReading {
    /// Whether the target is predicted to be closer after the look-ahead.
    pub fn is_closing(&self) -> bool {
        self.predicted_distance < self.distance
    }
}

/// Engagement controller status for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngagementView {
    pub phase: EngagementPhase,
    /// Target currently engaged, if any.
    pub target_id: Option<u32>,
    /// Ticks until the current shot resolves.
    pub ticks_to_fire: u32,
    pub stats: EngagementStats,
}

/// Running engagement counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementStats {
    pub started: u32,
    pub hits: u32,
    pub misses: u32,
    pub aborted: u32,
    pub manual_kills: u32,
}
