use super::{format_range, format_value, rule_id, Rule};
use crate::models::{
    EvaluationResult, Metric, Recommendation, RecommendationCategory, Severity,
};

/// Macronutrient advice for nitrogen, phosphorus and potassium.
///
/// Deficits get a targeted fertilizer; excesses get a hold on further
/// applications since surplus N and P run off into waterways.
pub struct FertilizerRule;

impl FertilizerRule {
    fn product(metric: Metric) -> &'static str {
        match metric {
            Metric::Nitrogen => "urea or a split nitrogen top-dress",
            Metric::Phosphorus => "DAP or single superphosphate",
            _ => "muriate of potash (MOP)",
        }
    }

    fn symptom(metric: Metric) -> &'static str {
        match metric {
            Metric::Nitrogen => "pale, yellowing older leaves and stunted growth",
            Metric::Phosphorus => "poor root development and purplish leaf tints",
            _ => "scorched leaf margins and weak stems prone to lodging",
        }
    }
}

impl Rule for FertilizerRule {
    fn id(&self) -> &'static str {
        "fertilizer"
    }

    fn name(&self) -> &'static str {
        "Macronutrient Balance"
    }

    fn metrics(&self) -> &'static [Metric] {
        &[Metric::Nitrogen, Metric::Phosphorus, Metric::Potassium]
    }

    fn advise(&self, eval: &EvaluationResult, severity: Severity) -> Recommendation {
        let nutrient = eval.metric.as_str();
        let current = format_value(eval.metric, eval.value);
        let ideal = format_range(eval);

        let rec = if eval.is_below() {
            Recommendation::new(
                rule_id(eval),
                RecommendationCategory::Fertilizer,
                severity,
                format!("Apply {} Fertilizer", nutrient),
                format!(
                    "{} level ({}) is below the ideal range of {}.",
                    nutrient, current, ideal
                ),
            )
            .with_explanation(format!(
                "{} deficiency shows as {}. Correcting it early protects yield potential.",
                nutrient,
                Self::symptom(eval.metric)
            ))
            .with_action(format!(
                "Apply {} at the soil-test recommended rate{}.",
                Self::product(eval.metric),
                if severity == Severity::Action {
                    " as soon as field conditions allow"
                } else {
                    " with the next scheduled application"
                }
            ))
        } else {
            Recommendation::new(
                rule_id(eval),
                RecommendationCategory::Fertilizer,
                severity,
                format!("Hold {} Applications", nutrient),
                format!(
                    "{} level ({}) is above the ideal range of {}.",
                    nutrient, current, ideal
                ),
            )
            .with_explanation(
                "Surplus nutrients are not taken up by the crop and are lost to runoff \
                 or leaching, adding cost without yield benefit.",
            )
            .with_action(format!(
                "Skip {} in the next fertilizer round and re-test before resuming.",
                nutrient.to_lowercase()
            ))
        };

        rec.for_metric(eval.metric)
            .with_data_point(nutrient, current, "Soil Probe")
            .with_data_point("Ideal Range", ideal, "Crop Profile")
    }
}
