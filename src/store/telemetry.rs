use crate::error::{FarmOpsError, Result};
use crate::models::{Metric, TelemetrySample, TimeWindow};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

type Series = BTreeMap<DateTime<Utc>, f64>;

/// Time-ordered soil and weather samples, keyed by farm and metric.
///
/// Samples are append-only: a `(farm, metric, timestamp)` triple can be
/// recorded once and is never overwritten.
#[derive(Debug, Clone, Default)]
pub struct TelemetryStore {
    series: HashMap<String, BTreeMap<Metric, Series>>,
    len: usize,
}

impl TelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sample: TelemetrySample) -> Result<()> {
        if !sample.value.is_finite() {
            warn!(
                farm_id = %sample.farm_id,
                metric = %sample.metric,
                value = sample.value,
                "Rejecting non-finite telemetry sample"
            );
            return Err(FarmOpsError::InvalidValue {
                farm_id: sample.farm_id,
                metric: sample.metric,
                value: sample.value,
            });
        }

        let series = self
            .series
            .entry(sample.farm_id.clone())
            .or_default()
            .entry(sample.metric)
            .or_default();

        if series.contains_key(&sample.timestamp) {
            warn!(
                farm_id = %sample.farm_id,
                metric = %sample.metric,
                timestamp = %sample.timestamp,
                "Rejecting duplicate telemetry sample"
            );
            return Err(FarmOpsError::DuplicateSample {
                farm_id: sample.farm_id,
                metric: sample.metric,
                timestamp: sample.timestamp.to_rfc3339(),
            });
        }

        series.insert(sample.timestamp, sample.value);
        self.len += 1;
        Ok(())
    }

    /// Inserts every sample, skipping duplicates. Returns how many were stored.
    pub fn extend(&mut self, samples: impl IntoIterator<Item = TelemetrySample>) -> usize {
        let mut stored = 0;
        for sample in samples {
            if self.insert(sample).is_ok() {
                stored += 1;
            }
        }
        debug!(stored, total = self.len, "Telemetry batch ingested");
        stored
    }

    /// Samples for one metric inside `window`, oldest first.
    pub fn series(&self, farm_id: &str, metric: Metric, window: &TimeWindow) -> Vec<TelemetrySample> {
        self.series
            .get(farm_id)
            .and_then(|metrics| metrics.get(&metric))
            .map(|series| {
                series
                    .range(window.start..=window.end)
                    .map(|(ts, value)| TelemetrySample::new(farm_id, metric, *value, *ts))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn latest(&self, farm_id: &str, metric: Metric) -> Option<TelemetrySample> {
        self.series
            .get(farm_id)?
            .get(&metric)?
            .iter()
            .next_back()
            .map(|(ts, value)| TelemetrySample::new(farm_id, metric, *value, *ts))
    }

    /// All samples for a farm inside `window`, grouped by metric then time.
    pub fn samples_in_window(&self, farm_id: &str, window: &TimeWindow) -> Vec<TelemetrySample> {
        self.metrics_for(farm_id)
            .into_iter()
            .flat_map(|metric| self.series(farm_id, metric, window))
            .collect()
    }

    pub fn metrics_for(&self, farm_id: &str) -> Vec<Metric> {
        self.series
            .get(farm_id)
            .map(|metrics| metrics.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap()
    }

    fn hourly(farm: &str, metric: Metric, values: &[f64]) -> Vec<TelemetrySample> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| TelemetrySample::new(farm, metric, *v, t0() + Duration::hours(i as i64)))
            .collect()
    }

    #[test]
    fn rejects_duplicate_timestamp() {
        let mut store = TelemetryStore::new();
        store
            .insert(TelemetrySample::new("farm1", Metric::Ph, 6.5, t0()))
            .unwrap();
        let dup = store.insert(TelemetrySample::new("farm1", Metric::Ph, 6.9, t0()));
        assert!(matches!(dup, Err(FarmOpsError::DuplicateSample { .. })));
        assert_eq!(store.len(), 1);
        // Original value is kept
        assert_eq!(store.latest("farm1", Metric::Ph).unwrap().value, 6.5);
    }

    #[test]
    fn rejects_non_finite_values() {
        let mut store = TelemetryStore::new();
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = store.insert(TelemetrySample::new("farm1", Metric::Moisture, value, t0()));
            assert!(matches!(result, Err(FarmOpsError::InvalidValue { .. })));
        }
        assert!(store.is_empty());
        // Batch ingest skips them and keeps the rest
        let mut samples = hourly("farm1", Metric::Moisture, &[70.0, 71.0]);
        samples.push(TelemetrySample::new(
            "farm1",
            Metric::Moisture,
            f64::NAN,
            t0() + Duration::hours(5),
        ));
        assert_eq!(store.extend(samples), 2);
        assert!(store.metrics_for("farm1").contains(&Metric::Moisture));
    }

    #[test]
    fn same_timestamp_different_metric_or_farm_is_fine() {
        let mut store = TelemetryStore::new();
        store
            .insert(TelemetrySample::new("farm1", Metric::Ph, 6.5, t0()))
            .unwrap();
        store
            .insert(TelemetrySample::new("farm1", Metric::Moisture, 70.0, t0()))
            .unwrap();
        store
            .insert(TelemetrySample::new("farm2", Metric::Ph, 6.1, t0()))
            .unwrap();
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn series_is_ordered_and_window_bounded() {
        let mut store = TelemetryStore::new();
        let mut samples = hourly("farm1", Metric::Moisture, &[70.0, 71.0, 72.0, 73.0, 74.0]);
        samples.reverse();
        assert_eq!(store.extend(samples), 5);

        let window = TimeWindow::new(t0() + Duration::hours(1), t0() + Duration::hours(3)).unwrap();
        let series = store.series("farm1", Metric::Moisture, &window);
        let values: Vec<f64> = series.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![71.0, 72.0, 73.0]);
        assert!(series.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn latest_and_unknown_farm() {
        let mut store = TelemetryStore::new();
        store.extend(hourly("farm1", Metric::Temperature, &[20.0, 22.0, 25.0]));
        assert_eq!(store.latest("farm1", Metric::Temperature).unwrap().value, 25.0);
        assert!(store.latest("farm1", Metric::Humidity).is_none());
        assert!(store.latest("nowhere", Metric::Temperature).is_none());
        assert!(store.metrics_for("nowhere").is_empty());
    }

    #[test]
    fn samples_in_window_covers_all_metrics() {
        let mut store = TelemetryStore::new();
        store.extend(hourly("farm1", Metric::Ph, &[6.4, 6.5]));
        store.extend(hourly("farm1", Metric::Moisture, &[70.0, 68.0]));
        store.extend(hourly("farm2", Metric::Moisture, &[50.0]));

        let window = TimeWindow::trailing_hours(t0() + Duration::hours(1), 1).unwrap();
        let samples = store.samples_in_window("farm1", &window);
        assert_eq!(samples.len(), 4);
        assert!(samples.iter().all(|s| s.farm_id == "farm1"));
        assert_eq!(store.metrics_for("farm1"), vec![Metric::Ph, Metric::Moisture]);
    }
}
