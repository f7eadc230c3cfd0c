//! Per-reading classification against a crop profile.

use crate::error::Result;
use crate::models::{
    Classification, CropProfile, EvaluationResult, Metric, NutrientLevel, NutrientStatus,
    TelemetrySample,
};

/// pH below this is acidic regardless of crop.
pub const PH_ACIDIC_BELOW: f64 = 6.0;
/// pH above this is alkaline regardless of crop.
pub const PH_ALKALINE_ABOVE: f64 = 7.5;

/// Fixed soil-reaction bands. The crop profile only decides `is_ideal` for pH.
pub fn classify_ph(value: f64) -> Classification {
    if value < PH_ACIDIC_BELOW {
        Classification::Acidic
    } else if value > PH_ALKALINE_ABOVE {
        Classification::Alkaline
    } else {
        Classification::Neutral
    }
}

/// Classify one sample against the profile's ideal range for its metric.
///
/// Fails with `UnknownMetricForProfile` when the profile has no range for
/// the sample's metric; no default range is ever assumed.
pub fn evaluate(sample: &TelemetrySample, profile: &CropProfile) -> Result<EvaluationResult> {
    let range = profile.ideal_range(sample.metric)?;
    let value = sample.value;

    let (classification, is_ideal) = match sample.metric {
        Metric::Ph => (classify_ph(value), range.contains(value)),
        _ => {
            let classification = if value < range.min {
                Classification::Low
            } else if value > range.max {
                Classification::High
            } else {
                Classification::Optimal
            };
            (classification, classification == Classification::Optimal)
        }
    };

    Ok(EvaluationResult {
        metric: sample.metric,
        value,
        classification,
        is_ideal,
        ideal_range: range,
        deviation: range.deviation(value),
    })
}

/// Whether a soil nutrient level (0-100) meets what the crop requires.
pub fn nutrient_status(level: f64, requirement: NutrientLevel) -> NutrientStatus {
    if level >= requirement.threshold() {
        NutrientStatus::Optimal
    } else {
        NutrientStatus::Low
    }
}
