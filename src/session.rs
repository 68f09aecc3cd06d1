//! One logical analysis session: owns the dataset and the sensor
//! registry, and exposes the operations the presentation layer calls.

use crate::aggregate::{aggregate, AggregationResult};
use crate::domain::{Dataset, SensorKind, SensorRegistry};
use crate::simulation::{generate_dataset, GeneratorConfig};
use crate::store::{self, StoreError};
use crate::window::{Granularity, TimeWindow, WindowError};
use chrono::{Local, NaiveDateTime};
use rand::Rng;
use std::path::Path;
use strum::IntoEnumIterator;
use tracing::warn;

#[derive(Debug, Default)]
pub struct Session {
    registry: SensorRegistry,
    dataset: Dataset,
    last_result: Option<AggregationResult>,
}

impl Session {
    /// Fresh session: every sensor disabled, no data.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &SensorRegistry {
        &self.registry
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Commit sensor enable/disable settings.
    pub fn apply_sensor_settings<I>(&mut self, settings: I)
    where
        I: IntoIterator<Item = (SensorKind, bool)>,
    {
        self.registry.apply(settings);
    }

    /// Generate a fresh dataset ending now, replacing any existing one.
    pub fn generate(&mut self, config: &GeneratorConfig) {
        let mut rng = config.rng();
        self.generate_at(Local::now().naive_local(), &mut rng);
    }

    /// Generate with an explicit clock and RNG.
    pub fn generate_at<R: Rng>(&mut self, now: NaiveDateTime, rng: &mut R) {
        self.dataset = generate_dataset(now, &self.registry, rng);
    }

    /// Export the dataset as CSV. Empty dataset: silent no-op.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        store::save_csv(&self.dataset, path)
    }

    /// Replace the dataset from a CSV file.
    ///
    /// All-or-nothing: on any error the current dataset and registry are
    /// untouched. On success the active flags are recomputed from the
    /// columns present in the file, which can silently enable or disable
    /// sensors relative to the pre-load state.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let dataset = store::load_csv(path)?;
        for kind in SensorKind::iter() {
            self.registry.set_active(kind, dataset.has_kind(kind));
        }
        self.dataset = dataset;
        Ok(())
    }

    /// Resolve a window and aggregate the dataset over it.
    ///
    /// On an unparsable anchor the previously rendered result is kept
    /// unchanged; the caller decides what feedback to show.
    pub fn render(
        &mut self,
        granularity: Granularity,
        anchor_text: &str,
    ) -> Result<&AggregationResult, WindowError> {
        let window = match TimeWindow::resolve(granularity, anchor_text) {
            Ok(window) => window,
            Err(err) => {
                warn!(%granularity, anchor = anchor_text, "window resolution failed");
                return Err(err);
            }
        };

        let result = aggregate(&self.dataset, &window, &self.registry);
        Ok(self.last_result.insert(result))
    }

    /// The most recent successful aggregation, if any.
    pub fn last_render(&self) -> Option<&AggregationResult> {
        self.last_result.as_ref()
    }
}
