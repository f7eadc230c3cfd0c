use super::{format_range, format_value, rule_id, Rule};
use crate::models::{
    EvaluationResult, Metric, Recommendation, RecommendationCategory, Severity,
};

/// Soil moisture advice.
///
/// - Below range: increase irrigation; depth scales with severity
/// - Above range: cut back irrigation and check drainage (root rot, leaching)
pub struct IrrigationRule;

impl Rule for IrrigationRule {
    fn id(&self) -> &'static str {
        "irrigation"
    }

    fn name(&self) -> &'static str {
        "Soil Moisture Management"
    }

    fn metrics(&self) -> &'static [Metric] {
        &[Metric::Moisture]
    }

    fn advise(&self, eval: &EvaluationResult, severity: Severity) -> Recommendation {
        let current = format_value(eval.metric, eval.value);
        let ideal = format_range(eval);

        let rec = if eval.is_below() {
            let action = match severity {
                Severity::Action => {
                    "Irrigate immediately with a deep soaking to refill the root zone. \
                     Follow with daily checks until moisture is back inside the ideal band. \
                     Mulch exposed rows to slow evaporation."
                }
                Severity::Watch => {
                    "Increase irrigation by roughly 15% over the next week, watering early \
                     morning to reduce evaporation losses."
                }
                Severity::Info => {
                    "Schedule the next irrigation slightly earlier than usual and keep \
                     monitoring soil moisture."
                }
            };
            Recommendation::new(
                rule_id(eval),
                RecommendationCategory::Irrigation,
                severity,
                "Increase Irrigation",
                format!(
                    "Soil moisture ({}) is below the ideal range of {}.",
                    current, ideal
                ),
            )
            .with_explanation(
                "Moisture below the crop's ideal band limits nutrient uptake and causes \
                 wilting stress. Prolonged deficits during active growth reduce yield.",
            )
            .with_action(action)
        } else {
            Recommendation::new(
                rule_id(eval),
                RecommendationCategory::Irrigation,
                severity,
                "Reduce Irrigation",
                format!(
                    "Soil moisture ({}) is above the ideal range of {}.",
                    current, ideal
                ),
            )
            .with_explanation(
                "Waterlogged soil starves roots of oxygen, favours root rot and leaches \
                 nitrogen below the root zone.",
            )
            .with_action(
                "Pause scheduled irrigation until moisture returns to the ideal band. \
                 Check field drainage and clear blocked channels.",
            )
        };

        rec.for_metric(eval.metric)
            .with_data_point("Soil Moisture", current, "Soil Probe")
            .with_data_point("Ideal Range", ideal, "Crop Profile")
    }
}
