//! # Aggregation Engine
//!
//! Filters the dataset by a resolved [`TimeWindow`], groups readings
//! into the window's bucket slots, and computes per-bucket aggregates
//! plus whole-window totals. Pure request/response: the engine holds no
//! state, so the presentation layer can recompute on demand.

use crate::domain::{AggregationKind, Dataset, SensorKind, SensorRegistry};
use crate::window::TimeWindow;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// One aggregated bucket of a sensor's series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketPoint {
    /// Slot index on the window's axis.
    pub slot: usize,
    /// Two-digit axis label for the slot.
    pub label: String,
    /// Sum or mean of the slot's readings, per the sensor's aggregation kind.
    pub value: f64,
}

/// Bucketed series for one sensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorSeries {
    pub kind: SensorKind,
    pub unit: String,
    pub aggregation: AggregationKind,
    /// Aggregates in slot order. Slots with no readings have no entry.
    pub points: Vec<BucketPoint>,
}

/// Whole-window totals for the cumulative sensor kinds.
///
/// Instantaneous kinds (temperature, humidity) intentionally have no
/// whole-window summary; a yearly mean of spot temperatures is not a
/// quantity the charts report. Kinds without data report 0.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WindowTotals {
    pub energy_kwh: f64,
    pub hot_water_l: f64,
    pub cold_water_l: f64,
}

/// Everything the presentation adapter needs to draw one window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationResult {
    pub window: TimeWindow,
    pub axis_title: String,
    pub axis_labels: Vec<String>,
    /// One series per active sensor present in the dataset.
    pub series: Vec<SensorSeries>,
    pub totals: WindowTotals,
}

impl AggregationResult {
    pub fn series_for(&self, kind: SensorKind) -> Option<&SensorSeries> {
        self.series.iter().find(|s| s.kind == kind)
    }
}

/// Aggregate the dataset over the window for every active sensor.
///
/// Sensors that are active but absent from the dataset produce no
/// series. An empty filtered window yields empty series and zero
/// totals; no active sensors yields an empty result set.
pub fn aggregate(
    dataset: &Dataset,
    window: &TimeWindow,
    registry: &SensorRegistry,
) -> AggregationResult {
    let mut series = Vec::new();
    let mut totals = WindowTotals::default();

    for kind in registry.active_kinds() {
        if !dataset.has_kind(kind) {
            continue;
        }

        series.push(bucketed_series(dataset, window, kind));

        match kind {
            SensorKind::Energy => totals.energy_kwh = window_sum(dataset, window, kind),
            SensorKind::HotWater => totals.hot_water_l = window_sum(dataset, window, kind),
            SensorKind::ColdWater => totals.cold_water_l = window_sum(dataset, window, kind),
            SensorKind::Temperature | SensorKind::Humidity => {}
        }
    }

    debug!(
        granularity = %window.granularity,
        anchor = %window.anchor,
        series = series.len(),
        "aggregated window"
    );

    AggregationResult {
        window: *window,
        axis_title: window.axis_title().to_string(),
        axis_labels: window.axis_labels(),
        series,
        totals,
    }
}

fn bucketed_series(dataset: &Dataset, window: &TimeWindow, kind: SensorKind) -> SensorSeries {
    let by_slot: HashMap<usize, Vec<f64>> = dataset
        .readings()
        .iter()
        .filter(|r| window.contains(r.timestamp))
        .filter_map(|r| r.value(kind).map(|v| (window.bucket_index(r.timestamp), v)))
        .into_group_map();

    let points = by_slot
        .into_iter()
        .sorted_by_key(|(slot, _)| *slot)
        .map(|(slot, values)| {
            let value = match kind.aggregation() {
                AggregationKind::Sum => values.iter().sum(),
                AggregationKind::Mean => values.iter().sum::<f64>() / values.len() as f64,
            };
            BucketPoint {
                slot,
                label: window.bucket_label(slot),
                value,
            }
        })
        .collect();

    SensorSeries {
        kind,
        unit: kind.unit().to_string(),
        aggregation: kind.aggregation(),
        points,
    }
}

/// Sum of a sensor's readings over the whole filtered window,
/// independent of bucketing.
fn window_sum(dataset: &Dataset, window: &TimeWindow, kind: SensorKind) -> f64 {
    dataset
        .readings()
        .iter()
        .filter(|r| window.contains(r.timestamp))
        .filter_map(|r| r.value(kind))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Reading;
    use crate::simulation::generate_dataset;
    use crate::window::Granularity;
    use chrono::{NaiveDate, NaiveDateTime};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn full_dataset() -> Dataset {
        // One year of data ending mid-June 2024, covering all of 2023.
        let mut rng = StdRng::seed_from_u64(42);
        generate_dataset(ts(2024, 6, 15, 14), &SensorRegistry::all_active(), &mut rng)
    }

    #[test]
    fn test_day_window_has_24_energy_buckets() {
        let dataset = full_dataset();
        let window = TimeWindow::resolve(Granularity::Day, "2024-03-15").unwrap();
        let result = aggregate(&dataset, &window, &SensorRegistry::all_active());

        let energy = result.series_for(SensorKind::Energy).unwrap();
        assert_eq!(energy.points.len(), 24);
        assert_eq!(energy.points[0].label, "00");
        assert_eq!(energy.points[23].label, "23");

        // Hourly buckets over hourly data hold exactly one reading each,
        // so a sum-kind bucket stays inside the generator's draw range.
        for point in &energy.points {
            assert!(point.value >= 0.5 && point.value <= 5.0);
        }
    }

    #[test]
    fn test_sum_invariant_bucket_totals_match_window_total() {
        let dataset = full_dataset();
        let registry = SensorRegistry::all_active();

        for anchor in ["2024-03-15", "2024-02-10", "2023-06-01"] {
            for granularity in [Granularity::Day, Granularity::Month, Granularity::Year] {
                let window = TimeWindow::resolve(granularity, anchor).unwrap();
                let result = aggregate(&dataset, &window, &registry);

                for (kind, total) in [
                    (SensorKind::Energy, result.totals.energy_kwh),
                    (SensorKind::HotWater, result.totals.hot_water_l),
                    (SensorKind::ColdWater, result.totals.cold_water_l),
                ] {
                    let bucket_sum: f64 = result
                        .series_for(kind)
                        .unwrap()
                        .points
                        .iter()
                        .map(|p| p.value)
                        .sum();
                    assert!(
                        (bucket_sum - total).abs() <= 1e-6,
                        "{kind} {granularity} {anchor}: {bucket_sum} vs {total}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_mean_bucket_lies_within_raw_bounds() {
        let dataset = full_dataset();
        let window = TimeWindow::resolve(Granularity::Month, "2023-08-10").unwrap();
        let result = aggregate(&dataset, &window, &SensorRegistry::all_active());

        let temperature = result.series_for(SensorKind::Temperature).unwrap();
        assert_eq!(temperature.aggregation, AggregationKind::Mean);

        for point in &temperature.points {
            let day = point.slot as u32 + 1;
            let raw: Vec<f64> = dataset
                .readings()
                .iter()
                .filter(|r| {
                    window.contains(r.timestamp) && window.bucket_index(r.timestamp) == point.slot
                })
                .filter_map(|r| r.value(SensorKind::Temperature))
                .collect();
            let min = raw.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = raw.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            assert!(
                point.value >= min && point.value <= max,
                "day {day}: {} not in [{min}, {max}]",
                point.value
            );
        }
    }

    #[test]
    fn test_final_calendar_day_is_outside_month_window() {
        let dataset = full_dataset();
        let window = TimeWindow::resolve(Granularity::Month, "2023-08-10").unwrap();
        let result = aggregate(&dataset, &window, &SensorRegistry::all_active());

        let energy = result.series_for(SensorKind::Energy).unwrap();
        assert_eq!(window.bucket_count(), 31);
        // Slot 30 (Aug 31) sits past the half-open end, so no entry.
        assert_eq!(energy.points.len(), 30);
        assert!(energy.points.iter().all(|p| p.slot < 30));
    }

    #[test]
    fn test_window_with_no_readings_yields_empty_series_and_zero_totals() {
        let dataset = full_dataset();
        // Far outside the generated range.
        let window = TimeWindow::resolve(Granularity::Day, "2020-01-01").unwrap();
        let result = aggregate(&dataset, &window, &SensorRegistry::all_active());

        assert_eq!(result.series.len(), 5);
        assert!(result.series.iter().all(|s| s.points.is_empty()));
        assert_eq!(result.totals.energy_kwh, 0.0);
        assert_eq!(result.totals.hot_water_l, 0.0);
        assert_eq!(result.totals.cold_water_l, 0.0);
    }

    #[test]
    fn test_no_active_kinds_yields_empty_result() {
        let dataset = full_dataset();
        let window = TimeWindow::resolve(Granularity::Day, "2024-03-15").unwrap();
        let result = aggregate(&dataset, &window, &SensorRegistry::new());

        assert!(result.series.is_empty());
        assert_eq!(result.totals.energy_kwh, 0.0);
    }

    #[test]
    fn test_inactive_kind_produces_no_series_even_if_present() {
        let dataset = full_dataset();
        let window = TimeWindow::resolve(Granularity::Day, "2024-03-15").unwrap();

        let mut registry = SensorRegistry::new();
        registry.set_active(SensorKind::Humidity, true);
        let result = aggregate(&dataset, &window, &registry);

        assert_eq!(result.series.len(), 1);
        assert_eq!(result.series[0].kind, SensorKind::Humidity);
        assert_eq!(result.totals.energy_kwh, 0.0);
    }

    #[test]
    fn test_result_serializes_for_presentation() {
        let dataset = full_dataset();
        let window = TimeWindow::resolve(Granularity::Year, "2023-06-01").unwrap();
        let result = aggregate(&dataset, &window, &SensorRegistry::all_active());

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"axis_title\":\"Month\""));
        assert!(json.contains("\"energy_kwh\""));
    }

    proptest! {
        /// The sum invariant holds for arbitrary hourly data in a month
        /// window, whatever subset of days and hours carries readings.
        #[test]
        fn prop_sum_invariant(points in prop::collection::vec((1u32..=27, 0u32..24, 0.0f64..100.0), 1..200)) {
            let mut dataset = Dataset::new(vec![SensorKind::Energy]);
            for (day, hour, value) in points {
                dataset.push(Reading::new(ts(2023, 2, day, hour)).with_value(SensorKind::Energy, value));
            }

            let window = TimeWindow::resolve(Granularity::Month, "2023-02-01").unwrap();
            let mut registry = SensorRegistry::new();
            registry.set_active(SensorKind::Energy, true);

            let result = aggregate(&dataset, &window, &registry);
            let bucket_sum: f64 = result.series_for(SensorKind::Energy).unwrap()
                .points.iter().map(|p| p.value).sum();

            prop_assert!((bucket_sum - result.totals.energy_kwh).abs() <= 1e-6);
        }
    }
}
