//! Sensor kinds and the registry of enabled sensors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::EnumIter;

/// How a sensor's readings are combined inside a bucket.
///
/// Cumulative quantities (consumed energy, water volume) are summed;
/// instantaneous-state quantities (temperature, humidity) are averaged.
/// This is a static property of the kind, never derived from its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregationKind {
    Sum,
    Mean,
}

/// The closed set of simulated sensors.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter,
)]
pub enum SensorKind {
    Energy,
    HotWater,
    ColdWater,
    Temperature,
    Humidity,
}

impl SensorKind {
    /// Unit label for axis/legend text.
    pub fn unit(&self) -> &'static str {
        match self {
            SensorKind::Energy => "kWh",
            SensorKind::HotWater | SensorKind::ColdWater => "L",
            SensorKind::Temperature => "C",
            SensorKind::Humidity => "%",
        }
    }

    /// Column header used in the CSV export, label with unit suffix.
    pub fn column_label(&self) -> &'static str {
        match self {
            SensorKind::Energy => "Energy (kWh)",
            SensorKind::HotWater => "Hot Water (L)",
            SensorKind::ColdWater => "Cold Water (L)",
            SensorKind::Temperature => "Temperature (C)",
            SensorKind::Humidity => "Humidity (%)",
        }
    }

    /// Inverse of [`column_label`](Self::column_label), for CSV import.
    pub fn from_column_label(label: &str) -> Option<Self> {
        use strum::IntoEnumIterator;
        SensorKind::iter().find(|kind| kind.column_label() == label)
    }

    pub fn aggregation(&self) -> AggregationKind {
        match self {
            SensorKind::Energy | SensorKind::HotWater | SensorKind::ColdWater => {
                AggregationKind::Sum
            }
            SensorKind::Temperature | SensorKind::Humidity => AggregationKind::Mean,
        }
    }

    pub fn is_cumulative(&self) -> bool {
        self.aggregation() == AggregationKind::Sum
    }
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column_label())
    }
}

/// Enabled/disabled flag per sensor kind.
///
/// Flags are read by the generator and the aggregation engine; they are
/// only mutated through an explicit settings commit or a dataset load,
/// and take effect on the next generate/aggregate call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SensorRegistry {
    active: BTreeMap<SensorKind, bool>,
}

impl SensorRegistry {
    /// All kinds start disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every kind enabled.
    pub fn all_active() -> Self {
        use strum::IntoEnumIterator;
        let mut registry = Self::new();
        for kind in SensorKind::iter() {
            registry.set_active(kind, true);
        }
        registry
    }

    pub fn set_active(&mut self, kind: SensorKind, active: bool) {
        self.active.insert(kind, active);
    }

    pub fn is_active(&self, kind: SensorKind) -> bool {
        self.active.get(&kind).copied().unwrap_or(false)
    }

    /// Enabled kinds in canonical declaration order.
    pub fn active_kinds(&self) -> Vec<SensorKind> {
        use strum::IntoEnumIterator;
        SensorKind::iter().filter(|k| self.is_active(*k)).collect()
    }

    /// Commit a full set of flags at once (the settings-dialog operation).
    pub fn apply<I>(&mut self, settings: I)
    where
        I: IntoIterator<Item = (SensorKind, bool)>,
    {
        for (kind, active) in settings {
            self.set_active(kind, active);
        }
    }
}
