//! Priority selection over a scan's readings.
//!
//! Order is total and deterministic: threat descending, then target id
//! ascending.

use std::cmp::Ordering;

use airdefense_core::state::RadarReading;

fn by_priority(a: &RadarReading, b: &RadarReading) -> Ordering {
    b.threat_level
        .total_cmp(&a.threat_level)
        .then(a.target_id.cmp(&b.target_id))
}

/// Readings at or above `min_threat`, highest priority first.
pub fn prioritize(readings: &[RadarReading], min_threat: f64) -> Vec<RadarReading> {
    let mut eligible: Vec<RadarReading> = readings
        .iter()
        .filter(|r| r.threat_level >= min_threat)
        .copied()
        .collect();
    eligible.sort_by(by_priority);
    eligible
}

/// The single best engagement candidate, if any reading qualifies.
pub fn select_candidate(readings: &[RadarReading], min_threat: f64) -> Option<u32> {
    readings
        .iter()
        .filter(|r| r.threat_level >= min_threat)
        .min_by(|a, b| by_priority(a, b))
        .map(|r| r.target_id)
}
