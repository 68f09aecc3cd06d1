//! The in-memory timestamped reading table.

use super::SensorKind;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One hourly record: a timestamp plus one value per recorded sensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: NaiveDateTime,
    values: BTreeMap<SensorKind, f64>,
}

impl Reading {
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, kind: SensorKind, value: f64) -> Self {
        self.values.insert(kind, value);
        self
    }

    pub fn set_value(&mut self, kind: SensorKind, value: f64) {
        self.values.insert(kind, value);
    }

    pub fn value(&self, kind: SensorKind) -> Option<f64> {
        self.values.get(&kind).copied()
    }
}

/// An ordered sequence of readings with a fixed column set.
///
/// Generation and load both replace the dataset wholesale; there is no
/// incremental merge. Generated datasets arrive sorted by timestamp
/// ascending at a strict 1-hour spacing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    kinds: Vec<SensorKind>,
    readings: Vec<Reading>,
}

impl Dataset {
    /// Empty dataset with the given column set.
    pub fn new(kinds: Vec<SensorKind>) -> Self {
        Self {
            kinds,
            readings: Vec::new(),
        }
    }

    pub fn push(&mut self, reading: Reading) {
        self.readings.push(reading);
    }

    /// Column set, in canonical order.
    pub fn kinds(&self) -> &[SensorKind] {
        &self.kinds
    }

    pub fn has_kind(&self, kind: SensorKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn timestamps(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        self.readings.iter().map(|r| r.timestamp)
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}
