//! Core domain types: sensor kinds, the registry of enabled sensors, and
//! the timestamped reading table they populate.

pub mod reading;
pub mod sensor;

pub use reading::{Dataset, Reading};
pub use sensor::{AggregationKind, SensorKind, SensorRegistry};
