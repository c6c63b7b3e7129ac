//! Core types and definitions for the air-defense simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! kinematic types, configuration, commands, snapshots, events, errors and
//! constants. It has no dependency on any runtime.

pub mod commands;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
