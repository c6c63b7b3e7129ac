//! Error types shared by the simulation crates.

use thiserror::Error;

/// Rejected configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a positive finite number, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("{name} must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("min_threat must be within [0, 100], got {0}")]
    InvalidThreshold(f64),

    #[error("speed band is empty: min {min} > max {max}")]
    InvalidSpeedRange { min: f64, max: f64 },

    #[error("{0} must be at least 1")]
    Zero(&'static str),

    #[error("initial_targets ({initial}) exceeds max_targets ({max})")]
    TooManyInitialTargets { initial: usize, max: usize },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failures that abort a single simulation tick.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("motion update produced a non-finite state for target {target_id}")]
    NonFiniteState { target_id: u32 },

    #[error("radar scan produced a non-finite reading for target {target_id}")]
    NonFiniteReading { target_id: u32 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SimError {
    /// The target whose state caused the failure, if any.
    pub fn target_id(&self) -> Option<u32> {
        match self {
            Self::NonFiniteState { target_id } | Self::NonFiniteReading { target_id } => {
                Some(*target_id)
            }
            Self::Config(_) => None,
        }
    }
}

/// Result type alias using [`SimError`].
pub type Result<T> = std::result::Result<T, SimError>;
