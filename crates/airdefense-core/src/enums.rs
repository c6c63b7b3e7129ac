//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// How the radar predicts where a target will be after the look-ahead interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApproachModel {
    /// Extrapolate the target's current velocity.
    #[default]
    Extrapolate,
    /// Estimate velocity from the displacement since the previous scan.
    /// A target seen for the first time has no approach component.
    Displacement,
}

/// Engagement controller state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngagementPhase {
    /// No target engaged.
    #[default]
    Idle,
    /// Committed to a target, firing delay running.
    Engaging,
}

/// How an engagement ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngagementResult {
    Hit,
    Miss,
    /// The target was destroyed or removed before the shot resolved.
    Aborted,
}

/// What destroyed a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestructionCause {
    /// Hit by the engagement controller.
    Engagement,
    /// Operator override (`DestroyNthActive`).
    Manual,
}

/// Why a target left the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalReason {
    /// Destroyed and its grace countdown reached zero.
    GraceExpired,
    /// Drifted beyond the sensor range slack.
    OutOfRange,
    /// Its state went non-finite and can no longer be simulated.
    Invalid,
}
