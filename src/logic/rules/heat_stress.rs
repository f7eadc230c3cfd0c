use super::{format_range, format_value, rule_id, Rule};
use crate::models::{
    EvaluationResult, Metric, Recommendation, RecommendationCategory, Severity,
};

/// Temperature advice relative to the crop's ideal band.
///
/// Severity levels:
/// - Info: slightly outside the band
/// - Watch: more than a quarter of the band width outside
/// - Action: more than a full band width outside
pub struct HeatStressRule;

impl Rule for HeatStressRule {
    fn id(&self) -> &'static str {
        "temperature"
    }

    fn name(&self) -> &'static str {
        "Temperature Stress"
    }

    fn metrics(&self) -> &'static [Metric] {
        &[Metric::Temperature]
    }

    fn advise(&self, eval: &EvaluationResult, severity: Severity) -> Recommendation {
        let current = format_value(eval.metric, eval.value);
        let ideal = format_range(eval);

        let rec = if eval.is_below() {
            let title = match severity {
                Severity::Action => "Cold Stress - Protect Crop",
                _ => "Cool Conditions Slowing Growth",
            };
            Recommendation::new(
                rule_id(eval),
                RecommendationCategory::HeatStress,
                severity,
                title,
                format!(
                    "Temperature ({}) is below the ideal range of {}.",
                    current, ideal
                ),
            )
            .with_explanation(
                "Below the ideal band root activity and nutrient uptake slow down. \
                 Frost-sensitive stages such as flowering are most at risk.",
            )
            .with_action(
                "Delay nitrogen top-dressing until temperatures recover. Irrigate lightly \
                 before expected cold nights; moist soil holds heat better than dry soil.",
            )
        } else {
            let title = match severity {
                Severity::Action => "Extreme Heat Stress",
                Severity::Watch => "Heat Stress Warning",
                Severity::Info => "Warm Conditions",
            };
            let action = match severity {
                Severity::Action => {
                    "Irrigate in early morning or evening only. Avoid all fertilizer and \
                     pesticide sprays during peak heat. Consider shade nets for nurseries."
                }
                Severity::Watch => {
                    "Shift irrigation to early morning and increase frequency. Avoid \
                     high-nitrogen applications until temperatures moderate."
                }
                Severity::Info => "Monitor soil moisture closely; warm soil dries out faster.",
            };
            Recommendation::new(
                rule_id(eval),
                RecommendationCategory::HeatStress,
                severity,
                title,
                format!(
                    "Temperature ({}) is above the ideal range of {}.",
                    current, ideal
                ),
            )
            .with_explanation(
                "Above the ideal band photosynthesis slows while water loss climbs. \
                 Heat during flowering and grain fill directly cuts yield.",
            )
            .with_action(action)
        };

        rec.for_metric(eval.metric)
            .with_data_point("Temperature", current, "Soil Probe")
            .with_data_point("Ideal Range", ideal, "Crop Profile")
    }
}
