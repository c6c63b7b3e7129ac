//! Signal strength and threat scoring.
//!
//! Threat model:
//! `threat = 100 * (0.5 * proximity + 0.3 * approach + 0.2 * speed)` where each
//! term is normalized to [0, 1]:
//! - proximity = `1 - distance / range`
//! - approach = closing rate over the prediction interval / reference speed,
//!   zero unless the predicted distance is shorter than the current one
//! - speed = target speed / reference speed
//!
//! Every output is clamped, and NaN inputs score zero.

use airdefense_core::constants::*;

/// Clamp to [0, 1], mapping NaN to 0.
fn unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Received signal strength in [0, 1]: linear falloff with range plus noise.
pub fn signal_strength(distance: f64, range: f64, noise: f64) -> f64 {
    unit(1.0 - distance / range + noise)
}

/// Proximity term: 1 at the sensor, 0 at or beyond `range`.
pub fn distance_threat(distance: f64, range: f64) -> f64 {
    unit(1.0 - distance / range)
}

/// Closing-rate term. Receding or holding targets score zero.
pub fn approach_threat(distance: f64, predicted_distance: f64, interval_secs: f64) -> f64 {
    let closing = distance - predicted_distance;
    if closing.is_nan() || closing <= 0.0 {
        return 0.0;
    }
    unit(closing / interval_secs / REFERENCE_MAX_SPEED)
}

/// Speed term normalized against [`REFERENCE_MAX_SPEED`].
pub fn speed_threat(speed: f64) -> f64 {
    unit(speed / REFERENCE_MAX_SPEED)
}

/// Combined threat level in [0, 100].
pub fn threat_level(
    distance: f64,
    predicted_distance: f64,
    speed: f64,
    range: f64,
    interval_secs: f64,
) -> f64 {
    let score = THREAT_WEIGHT_DISTANCE * distance_threat(distance, range)
        + THREAT_WEIGHT_APPROACH * approach_threat(distance, predicted_distance, interval_secs)
        + THREAT_WEIGHT_SPEED * speed_threat(speed);
    THREAT_MAX * unit(score)
}
