//! Simulation constants and tuning parameters.
//!
//! Values prefixed `DEFAULT_` seed [`crate::config::SimConfig`]; the rest are
//! fixed for the whole run.

// --- Cadence ---

/// Wall-clock interval between ticks (milliseconds).
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Simulated seconds per tick.
pub const DEFAULT_TIME_STEP_SECS: f64 = 1.0;

// --- Radar ---

/// Sensor detection range in meters (100 km).
pub const DEFAULT_SENSOR_RANGE: f64 = 100_000.0;

/// Targets farther than `range * RANGE_SLACK` from the sensor leave the area.
pub const RANGE_SLACK: f64 = 1.5;

/// Half-width of the uniform noise added to signal strength.
pub const DEFAULT_SIGNAL_NOISE: f64 = 0.05;

/// Look-ahead used for predicted distance (seconds).
pub const DEFAULT_PREDICTION_INTERVAL_SECS: f64 = 10.0;

// --- Threat scoring ---

/// Upper bound of the threat scale.
pub const THREAT_MAX: f64 = 100.0;

/// Weight of the proximity term.
pub const THREAT_WEIGHT_DISTANCE: f64 = 0.5;

/// Weight of the closing-rate term.
pub const THREAT_WEIGHT_APPROACH: f64 = 0.3;

/// Weight of the speed term.
pub const THREAT_WEIGHT_SPEED: f64 = 0.2;

/// Speed (m/s) that saturates the speed and closing-rate terms.
pub const REFERENCE_MAX_SPEED: f64 = 1000.0;

// --- Targets ---

/// Registry capacity.
pub const DEFAULT_MAX_TARGETS: usize = 20;

/// Chance of a spawn attempt succeeding each tick.
pub const DEFAULT_SPAWN_PROBABILITY: f64 = 0.7;

/// Slowest spawned target (m/s).
pub const DEFAULT_MIN_SPEED: f64 = 100.0;

/// Fastest spawned target (m/s).
pub const DEFAULT_MAX_SPEED: f64 = 1000.0;

/// Ticks a destroyed target stays visible before removal.
pub const DEFAULT_GRACE_TICKS: u32 = 4;

// --- Motion ---

/// Largest heading change applied per tick by turbulence (degrees).
pub const DEFAULT_MAX_TURN_DEG: f64 = 15.0;

/// Course elevation stays within +/- this angle (degrees).
pub const DEFAULT_MAX_ELEVATION_DEG: f64 = 45.0;

// --- Engagement ---

/// Probability that a shot destroys its target.
pub const DEFAULT_HIT_PROBABILITY: f64 = 0.33;

/// Ticks between engagement start and resolution.
pub const DEFAULT_FIRE_DELAY_TICKS: u32 = 1;

/// Minimum threat level for a reading to be engagement-eligible.
pub const DEFAULT_MIN_THREAT: f64 = 0.0;
