//! Events emitted by the simulation for logging and UI feedback.
//!
//! The engine only produces these values; presentation lives with whoever
//! consumes them.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::state::TargetView;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// The driver started with this many targets in the registry.
    SystemStart { target_count: usize },
    /// The driver stopped.
    SystemStop,
    /// One scan completed.
    ScanSummary {
        reading_count: usize,
        /// Readings at or above the engagement threshold.
        priority_count: usize,
    },
    TargetSpawned { target: TargetView },
    EngagementStarted { target: TargetView },
    TargetDestroyed {
        target: TargetView,
        cause: DestructionCause,
    },
    EngagementMissed { target: TargetView },
    /// The engaged target vanished or died before the shot resolved.
    EngagementAborted { target_id: u32 },
    TargetRemoved { target_id: u32, reason: RemovalReason },
    /// A tick failed and was abandoned.
    Error { message: String },
}
