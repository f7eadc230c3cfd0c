use super::{format_range, rule_id, Rule};
use crate::models::{
    EvaluationResult, Metric, Recommendation, RecommendationCategory, Severity,
};

/// Soil reaction advice: lime for soil more acidic than the crop tolerates,
/// elemental sulfur or acidifying fertilizer for soil that is too alkaline.
pub struct SoilPhRule;

impl Rule for SoilPhRule {
    fn id(&self) -> &'static str {
        "soil_ph"
    }

    fn name(&self) -> &'static str {
        "Soil pH Correction"
    }

    fn metrics(&self) -> &'static [Metric] {
        &[Metric::Ph]
    }

    fn advise(&self, eval: &EvaluationResult, severity: Severity) -> Recommendation {
        let current = format!("{:.1} ({})", eval.value, eval.classification);
        let ideal = format_range(eval);

        let rec = if eval.is_below() {
            Recommendation::new(
                rule_id(eval),
                RecommendationCategory::SoilAmendment,
                severity,
                "Apply Agricultural Lime",
                format!("Soil pH {} is below the crop's ideal range of {}.", current, ideal),
            )
            .with_explanation(
                "Acidic soil locks up phosphorus and molybdenum and can release toxic \
                 aluminium. Lime raises pH gradually over several months.",
            )
            .with_action(if severity == Severity::Action {
                "Get a lime requirement test and apply the recommended rate before the \
                 next sowing. Avoid ammonium-based fertilizers meanwhile."
            } else {
                "Plan a light lime application and re-test pH next season."
            })
        } else {
            Recommendation::new(
                rule_id(eval),
                RecommendationCategory::SoilAmendment,
                severity,
                "Lower Soil pH",
                format!("Soil pH {} is above the crop's ideal range of {}.", current, ideal),
            )
            .with_explanation(
                "Alkaline soil reduces availability of iron, manganese, zinc and \
                 phosphorus, often showing as yellowing between leaf veins.",
            )
            .with_action(if severity == Severity::Action {
                "Incorporate elemental sulfur or gypsum and switch to acidifying \
                 fertilizers such as ammonium sulfate. Add organic matter."
            } else {
                "Prefer acidifying fertilizers and add compost; re-test pH next season."
            })
        };

        rec.for_metric(eval.metric)
            .with_data_point("Soil pH", format!("{:.1}", eval.value), "Soil Probe")
            .with_data_point("Ideal Range", ideal, "Crop Profile")
    }
}
