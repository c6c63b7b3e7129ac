//! Radar: threat scoring and the concurrent scanner.

pub mod scanner;
pub mod scoring;

pub use scanner::RadarScanner;
pub use scoring::{signal_strength, threat_level};
