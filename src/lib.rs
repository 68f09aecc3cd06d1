//! # IoT Sensor Simulator
//!
//! Simulates hourly IoT sensor readings (energy, hot/cold water,
//! temperature, humidity) over a trailing one-year window, persists
//! them as CSV, and computes time-windowed aggregate series for
//! charting.
//!
//! ## Components
//!
//! - [`domain`]: sensor kinds with static metadata, the enabled-sensor
//!   registry, and the timestamped reading table
//! - [`simulation`]: the synthetic generator with injectable randomness
//! - [`store`]: CSV export/import with exact round-tripping
//! - [`window`]: granularity + anchor date -> half-open interval,
//!   bucket rule, and axis labels
//! - [`aggregate`]: the pure aggregation engine
//! - [`session`]: the stateful facade a presentation layer drives

pub mod aggregate;
pub mod config;
pub mod domain;
pub mod session;
pub mod simulation;
pub mod store;
pub mod telemetry;
pub mod window;

pub use aggregate::{aggregate, AggregationResult, BucketPoint, SensorSeries, WindowTotals};
pub use domain::{AggregationKind, Dataset, Reading, SensorKind, SensorRegistry};
pub use session::Session;
pub use simulation::{generate_dataset, GeneratorConfig};
pub use store::StoreError;
pub use window::{Granularity, TimeWindow, WindowError};
