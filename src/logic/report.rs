use super::aggregator::{aggregate, nutrient_report, suitability_score, trend};
use super::evaluator::evaluate;
use super::rules::RulesEngine;
use crate::error::{FarmOpsError, Result};
use crate::models::{CropProfile, FarmReport, TimeWindow};
use crate::store::TelemetryStore;
use std::collections::BTreeMap;
use tracing::debug;

/// Runs the full evaluation pipeline for one farm against one crop:
/// aggregate the window, classify the latest reading per metric, score
/// suitability, check nutrients and rank recommendations.
pub fn analyze(
    store: &TelemetryStore,
    engine: &RulesEngine,
    profile: &CropProfile,
    farm_id: &str,
    window: &TimeWindow,
) -> Result<FarmReport> {
    let samples = store.samples_in_window(farm_id, window);
    let aggregates = aggregate(farm_id, &samples, window)?;

    let mut evaluations = Vec::new();
    let mut skipped_metrics = Vec::new();
    let mut trends = BTreeMap::new();

    for metric in aggregates.keys().copied() {
        let series = store.series(farm_id, metric, window);
        trends.insert(metric, trend(&series));

        let Some(latest) = series.last() else {
            continue;
        };
        match evaluate(latest, profile) {
            Ok(result) => evaluations.push(result),
            Err(FarmOpsError::UnknownMetricForProfile { .. }) => {
                debug!(
                    farm_id,
                    crop_id = %profile.crop_id,
                    metric = %metric,
                    "Skipping metric without ideal range"
                );
                skipped_metrics.push(metric);
            }
            Err(e) => return Err(e),
        }
    }

    let suitability = suitability_score(&aggregates, profile)?;
    let nutrients = nutrient_report(&aggregates, profile);
    let recommendations = engine.recommend(&evaluations, &suitability);

    debug!(
        farm_id,
        crop_id = %profile.crop_id,
        score = suitability.score,
        recommendations = recommendations.len(),
        "Farm analysis complete"
    );

    Ok(FarmReport {
        farm_id: farm_id.to_string(),
        crop_id: profile.crop_id.clone(),
        window: *window,
        evaluations,
        aggregates,
        suitability,
        nutrients,
        trends,
        recommendations,
        skipped_metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Metric, Severity, TelemetrySample, Trend};
    use crate::store::CropRegistry;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap()
    }

    fn load(store: &mut TelemetryStore, farm: &str, metric: Metric, values: &[f64]) {
        store.extend(values.iter().enumerate().map(|(i, v)| {
            TelemetrySample::new(farm, metric, *v, t0() + Duration::hours(i as i64))
        }));
    }

    fn window() -> TimeWindow {
        TimeWindow::new(t0(), t0() + Duration::hours(23)).unwrap()
    }

    #[test]
    fn dry_field_report() {
        let registry = CropRegistry::builtin().unwrap();
        let wheat = registry.get("wheat").unwrap();

        let mut store = TelemetryStore::new();
        load(&mut store, "farm1", Metric::Moisture, &[52.0, 45.0, 40.0, 36.0]);
        load(&mut store, "farm1", Metric::Ph, &[6.5, 6.4, 6.3, 6.2]);
        load(&mut store, "farm1", Metric::Nitrogen, &[46.0, 44.0, 45.0, 45.0]);
        load(&mut store, "farm1", Metric::WindSpeed, &[12.0, 14.0, 9.0, 11.0]);
        // Other farm never leaks in
        load(&mut store, "farm2", Metric::Moisture, &[90.0]);

        let report = analyze(&store, &RulesEngine::new(), wheat, "farm1", &window()).unwrap();

        assert_eq!(report.aggregates.len(), 4);
        assert_eq!(report.skipped_metrics, vec![Metric::WindSpeed]);
        assert_eq!(report.evaluations.len(), 3);
        assert_eq!(report.trends[&Metric::Moisture], Trend::Falling);

        let moisture = report
            .evaluations
            .iter()
            .find(|e| e.metric == Metric::Moisture)
            .unwrap();
        assert_eq!(moisture.value, 36.0);

        assert_eq!(report.recommendations[0].related_metric, Some(Metric::Moisture));
        assert_eq!(report.recommendations[0].severity, Severity::Action);
        assert_eq!(report.out_of_range().count(), 1);

        // Nitrogen ~45 vs High requirement (70)
        assert_eq!(report.deficient_nutrients().count(), 1);
        assert!((0.0..=100.0).contains(&report.suitability.score));
    }

    #[test]
    fn empty_window_has_nothing_to_score() {
        let registry = CropRegistry::builtin().unwrap();
        let store = TelemetryStore::new();
        let result = analyze(
            &store,
            &RulesEngine::new(),
            registry.get("rice").unwrap(),
            "farm1",
            &window(),
        );
        assert!(matches!(
            result,
            Err(FarmOpsError::NoComparableMetrics { .. })
        ));
    }

    #[test]
    fn report_serializes_for_presentation() {
        let registry = CropRegistry::builtin().unwrap();
        let mut store = TelemetryStore::new();
        load(&mut store, "farm1", Metric::Moisture, &[70.0]);
        let report = analyze(
            &store,
            &RulesEngine::new(),
            registry.get("wheat").unwrap(),
            "farm1",
            &window(),
        )
        .unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["farmId"], "farm1");
        assert_eq!(json["suitability"]["score"], 100.0);
        assert!(json["recommendations"].as_array().unwrap().is_empty());
    }
}
