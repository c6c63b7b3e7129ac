use thiserror::Error;

use airdefense_core::error::SimError;

/// Failures of the driver loop itself.
#[derive(Debug, Error)]
pub enum LoopError {
    #[error("simulation could not start: {0}")]
    Sim(#[from] SimError),

    #[error("failed to spawn the simulation thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("simulation loop has stopped")]
    Stopped,
}
