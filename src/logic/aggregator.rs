use super::evaluator::nutrient_status;
use crate::error::{FarmOpsError, Result};
use crate::models::{
    CropProfile, Metric, NutrientFinding, SuitabilityScore, TelemetrySample, TimeWindow, Trend,
    WindowAggregate,
};
use std::collections::BTreeMap;

/// min/avg/max of one metric for one farm over a closed window.
///
/// `avg` is the arithmetic mean, not time-weighted.
pub fn aggregate_metric(
    farm_id: &str,
    samples: &[TelemetrySample],
    metric: Metric,
    window: &TimeWindow,
) -> Result<WindowAggregate> {
    let values: Vec<f64> = samples
        .iter()
        .filter(|s| s.farm_id == farm_id && s.metric == metric && window.contains(s.timestamp))
        .map(|s| s.value)
        .collect();

    if values.is_empty() {
        return Err(FarmOpsError::InsufficientData {
            farm_id: farm_id.to_string(),
            metric,
        });
    }
    if let Some(value) = values.iter().copied().find(|v| !v.is_finite()) {
        return Err(FarmOpsError::InvalidValue {
            farm_id: farm_id.to_string(),
            metric,
            value,
        });
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // Summation rounding can push the mean a few ulps past the extremes
    let avg = (values.iter().sum::<f64>() / values.len() as f64).clamp(min, max);

    Ok(WindowAggregate {
        farm_id: farm_id.to_string(),
        metric,
        window_start: window.start,
        window_end: window.end,
        min,
        max,
        avg,
        sample_count: values.len(),
    })
}

/// Aggregates every metric that appears in `samples` for this farm.
///
/// Fails with `InsufficientData` if any of those metrics has no sample
/// inside the window.
pub fn aggregate(
    farm_id: &str,
    samples: &[TelemetrySample],
    window: &TimeWindow,
) -> Result<BTreeMap<Metric, WindowAggregate>> {
    let mut metrics: Vec<Metric> = samples
        .iter()
        .filter(|s| s.farm_id == farm_id)
        .map(|s| s.metric)
        .collect();
    metrics.sort();
    metrics.dedup();

    metrics
        .into_iter()
        .map(|metric| aggregate_metric(farm_id, samples, metric, window).map(|agg| (metric, agg)))
        .collect()
}

/// `100 * (1 - normalized distance of avg from the ideal midpoint)`, in [0, 100].
pub fn component_score(avg: f64, min: f64, max: f64) -> f64 {
    let midpoint = (min + max) / 2.0;
    let width = max - min;
    let distance = if width > 0.0 {
        ((avg - midpoint).abs() / width).min(1.0)
    } else if avg == midpoint {
        0.0
    } else {
        1.0
    };
    (100.0 * (1.0 - distance)).clamp(0.0, 100.0)
}

/// Unweighted mean of component scores over metrics present in both the
/// aggregates and the profile's ideal ranges.
pub fn suitability_score(
    aggregates: &BTreeMap<Metric, WindowAggregate>,
    profile: &CropProfile,
) -> Result<SuitabilityScore> {
    let component_scores: BTreeMap<Metric, f64> = aggregates
        .iter()
        .filter_map(|(metric, agg)| {
            profile
                .ideal_ranges
                .get(metric)
                .map(|range| (*metric, component_score(agg.avg, range.min, range.max)))
        })
        .collect();

    if component_scores.is_empty() {
        return Err(FarmOpsError::NoComparableMetrics {
            crop_id: profile.crop_id.clone(),
        });
    }

    let score = component_scores.values().sum::<f64>() / component_scores.len() as f64;
    let farm_id = aggregates
        .values()
        .next()
        .map(|a| a.farm_id.clone())
        .unwrap_or_default();

    Ok(SuitabilityScore {
        crop_id: profile.crop_id.clone(),
        farm_id,
        score: score.clamp(0.0, 100.0),
        component_scores,
    })
}

/// Nutrient adequacy for each requirement of the profile that has data.
pub fn nutrient_report(
    aggregates: &BTreeMap<Metric, WindowAggregate>,
    profile: &CropProfile,
) -> Vec<NutrientFinding> {
    profile
        .nutrient_requirements
        .iter()
        .filter_map(|(nutrient, requirement)| {
            aggregates.get(&nutrient.metric()).map(|agg| NutrientFinding {
                nutrient: *nutrient,
                level: agg.avg,
                requirement: *requirement,
                status: nutrient_status(agg.avg, *requirement),
            })
        })
        .collect()
}

/// Compare first-half and second-half means of a time-ordered series.
pub fn trend(series: &[TelemetrySample]) -> Trend {
    if series.len() < 4 {
        return Trend::Unknown;
    }

    let mid = series.len() / 2;
    let mean = |xs: &[TelemetrySample]| xs.iter().map(|s| s.value).sum::<f64>() / xs.len() as f64;
    let earlier = mean(&series[..mid]);
    let later = mean(&series[mid..]);

    let dead_band = (earlier.abs() * 0.02).max(1e-6);
    if later - earlier > dead_band {
        Trend::Rising
    } else if earlier - later > dead_band {
        Trend::Falling
    } else {
        Trend::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Nutrient, NutrientLevel, NutrientStatus};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap()
    }

    fn hourly(metric: Metric, values: &[f64]) -> Vec<TelemetrySample> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| TelemetrySample::new("farm1", metric, *v, t0() + Duration::hours(i as i64)))
            .collect()
    }

    fn window(hours: i64) -> TimeWindow {
        TimeWindow::new(t0(), t0() + Duration::hours(hours)).unwrap()
    }

    fn agg(metric: Metric, avg: f64) -> WindowAggregate {
        WindowAggregate {
            farm_id: "farm1".into(),
            metric,
            window_start: t0(),
            window_end: t0(),
            min: avg,
            max: avg,
            avg,
            sample_count: 1,
        }
    }

    fn wheat() -> CropProfile {
        CropProfile::new("wheat", "Wheat")
            .with_range(Metric::Moisture, 60.0, 80.0)
            .unwrap()
            .with_range(Metric::Temperature, 15.0, 24.0)
            .unwrap()
            .with_range(Metric::Ph, 6.0, 7.5)
            .unwrap()
            .with_requirement(Nutrient::Nitrogen, NutrientLevel::High)
            .with_requirement(Nutrient::Phosphorus, NutrientLevel::Medium)
    }

    #[test]
    fn aggregate_statistics() {
        let samples = hourly(Metric::Moisture, &[70.0, 64.0, 76.0, 70.0]);
        let result = aggregate_metric("farm1", &samples, Metric::Moisture, &window(3)).unwrap();
        assert_eq!(result.min, 64.0);
        assert_eq!(result.max, 76.0);
        assert!((result.avg - 70.0).abs() < 1e-9);
        assert_eq!(result.sample_count, 4);
    }

    #[test]
    fn aggregate_window_is_inclusive() {
        let samples = hourly(Metric::Moisture, &[10.0, 20.0, 30.0, 40.0, 50.0]);
        let w = TimeWindow::new(t0() + Duration::hours(1), t0() + Duration::hours(3)).unwrap();
        let result = aggregate_metric("farm1", &samples, Metric::Moisture, &w).unwrap();
        assert_eq!(result.sample_count, 3);
        assert_eq!(result.min, 20.0);
        assert_eq!(result.max, 40.0);
    }

    #[test]
    fn aggregate_avg_stays_within_bounds() {
        // 0.1 summed three times rounds above 0.3
        let samples = hourly(Metric::OrganicMatter, &[0.1, 0.1, 0.1]);
        let result = aggregate_metric("farm1", &samples, Metric::OrganicMatter, &window(3)).unwrap();
        assert!(result.min <= result.avg && result.avg <= result.max);
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let only_nan = hourly(Metric::Moisture, &[f64::NAN]);
        assert!(matches!(
            aggregate_metric("farm1", &only_nan, Metric::Moisture, &window(1)),
            Err(FarmOpsError::InvalidValue { .. })
        ));

        let mixed = hourly(Metric::Moisture, &[50.0, f64::NAN]);
        assert!(matches!(
            aggregate_metric("farm1", &mixed, Metric::Moisture, &window(1)),
            Err(FarmOpsError::InvalidValue {
                metric: Metric::Moisture,
                ..
            })
        ));

        let infinite = hourly(Metric::Ph, &[6.5, f64::INFINITY]);
        assert!(aggregate("farm1", &infinite, &window(1)).is_err());
    }

    #[test]
    fn empty_window_is_insufficient_data() {
        let samples = hourly(Metric::Moisture, &[70.0]);
        let later = TimeWindow::new(t0() + Duration::hours(5), t0() + Duration::hours(6)).unwrap();
        assert!(matches!(
            aggregate_metric("farm1", &samples, Metric::Moisture, &later),
            Err(FarmOpsError::InsufficientData {
                metric: Metric::Moisture,
                ..
            })
        ));
        // Other farm's samples never count
        assert!(aggregate_metric("farm2", &samples, Metric::Moisture, &window(1)).is_err());
    }

    #[test]
    fn aggregate_groups_by_metric() {
        let mut samples = hourly(Metric::Moisture, &[70.0, 72.0]);
        samples.extend(hourly(Metric::Ph, &[6.4, 6.6]));
        let map = aggregate("farm1", &samples, &window(1)).unwrap();
        assert_eq!(map.len(), 2);
        assert!((map[&Metric::Ph].avg - 6.5).abs() < 1e-9);
        assert_eq!(map[&Metric::Moisture].sample_count, 2);
    }

    #[test]
    fn aggregate_fails_when_a_metric_falls_outside_window() {
        let mut samples = hourly(Metric::Moisture, &[70.0]);
        samples.push(TelemetrySample::new(
            "farm1",
            Metric::Ph,
            6.5,
            t0() + Duration::days(3),
        ));
        assert!(matches!(
            aggregate("farm1", &samples, &window(1)),
            Err(FarmOpsError::InsufficientData {
                metric: Metric::Ph,
                ..
            })
        ));
    }

    #[test]
    fn component_score_shape() {
        assert!((component_score(70.0, 60.0, 80.0) - 100.0).abs() < 1e-9);
        assert!((component_score(80.0, 60.0, 80.0) - 50.0).abs() < 1e-9);
        assert!((component_score(75.0, 60.0, 80.0) - 75.0).abs() < 1e-9);
        // Distance is capped at one range width
        assert_eq!(component_score(36.0, 60.0, 80.0), 0.0);
        assert_eq!(component_score(500.0, 60.0, 80.0), 0.0);
        // Degenerate range
        assert_eq!(component_score(5.0, 5.0, 5.0), 100.0);
        assert_eq!(component_score(5.1, 5.0, 5.0), 0.0);
    }

    #[test]
    fn suitability_uses_intersection_only() {
        let mut aggregates = BTreeMap::new();
        aggregates.insert(Metric::Moisture, agg(Metric::Moisture, 70.0));
        aggregates.insert(Metric::Temperature, agg(Metric::Temperature, 24.0));
        // Not in the profile, ignored
        aggregates.insert(Metric::WindSpeed, agg(Metric::WindSpeed, 90.0));

        let score = suitability_score(&aggregates, &wheat()).unwrap();
        assert_eq!(score.component_scores.len(), 2);
        assert!((score.score - 75.0).abs() < 1e-9);
        assert_eq!(score.farm_id, "farm1");
        assert_eq!(score.crop_id, "wheat");
        assert!(score.component(Metric::WindSpeed).is_none());
    }

    #[test]
    fn suitability_is_order_independent_and_bounded() {
        let entries = vec![
            (Metric::Moisture, agg(Metric::Moisture, 36.0)),
            (Metric::Temperature, agg(Metric::Temperature, 19.5)),
            (Metric::Ph, agg(Metric::Ph, 7.1)),
        ];
        let forward: BTreeMap<_, _> = entries.iter().cloned().collect();
        let backward: BTreeMap<_, _> = entries.iter().rev().cloned().collect();

        let a = suitability_score(&forward, &wheat()).unwrap();
        let b = suitability_score(&backward, &wheat()).unwrap();
        assert_eq!(a, b);
        assert!((0.0..=100.0).contains(&a.score));
    }

    #[test]
    fn suitability_without_overlap_fails() {
        let mut aggregates = BTreeMap::new();
        aggregates.insert(Metric::WindSpeed, agg(Metric::WindSpeed, 12.0));
        assert!(matches!(
            suitability_score(&aggregates, &wheat()),
            Err(FarmOpsError::NoComparableMetrics { .. })
        ));
        assert!(suitability_score(&BTreeMap::new(), &wheat()).is_err());
    }

    #[test]
    fn nutrient_report_flags_deficiency() {
        let mut aggregates = BTreeMap::new();
        aggregates.insert(Metric::Nitrogen, agg(Metric::Nitrogen, 65.0));
        aggregates.insert(Metric::Phosphorus, agg(Metric::Phosphorus, 55.0));

        let report = nutrient_report(&aggregates, &wheat());
        assert_eq!(report.len(), 2);
        let nitrogen = report.iter().find(|f| f.nutrient == Nutrient::Nitrogen).unwrap();
        assert_eq!(nitrogen.status, NutrientStatus::Low);
        assert!(nitrogen.is_deficient());
        let phosphorus = report.iter().find(|f| f.nutrient == Nutrient::Phosphorus).unwrap();
        assert_eq!(phosphorus.status, NutrientStatus::Optimal);
    }

    #[test]
    fn trend_detection() {
        assert_eq!(trend(&hourly(Metric::Moisture, &[70.0, 71.0, 76.0, 78.0])), Trend::Rising);
        assert_eq!(trend(&hourly(Metric::Moisture, &[78.0, 76.0, 71.0, 70.0])), Trend::Falling);
        assert_eq!(trend(&hourly(Metric::Moisture, &[70.0, 70.5, 70.2, 70.4])), Trend::Stable);
        assert_eq!(trend(&hourly(Metric::Moisture, &[70.0, 80.0])), Trend::Unknown);
    }
}
