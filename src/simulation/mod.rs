//! # Synthetic Data Simulation
//!
//! Hourly sensor readings with physically-plausible diurnal patterns,
//! covering a trailing one-year window.

pub mod generator;

pub use generator::{generate_dataset, GeneratorConfig};
