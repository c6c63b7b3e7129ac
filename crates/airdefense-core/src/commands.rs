//! Operator commands sent from outside the simulation.
//!
//! Commands are queued and applied at the next tick boundary.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OperatorCommand {
    /// Destroy the `index`-th non-destroyed target in id order.
    /// Out-of-range indices are ignored.
    DestroyNthActive { index: usize },
}
