use super::{format_range, format_value, rule_id, Rule};
use crate::models::{
    EvaluationResult, Metric, Recommendation, RecommendationCategory, Severity,
};

/// Organic matter and salinity (electrical conductivity) advice.
pub struct SoilHealthRule;

impl SoilHealthRule {
    fn organic_matter(eval: &EvaluationResult, severity: Severity) -> Recommendation {
        let current = format_value(eval.metric, eval.value);
        let ideal = format_range(eval);
        if eval.is_below() {
            Recommendation::new(
                rule_id(eval),
                RecommendationCategory::SoilHealth,
                severity,
                "Build Soil Organic Matter",
                format!("Organic matter ({}) is below the ideal range of {}.", current, ideal),
            )
            .with_explanation(
                "Organic matter holds water and nutrients and feeds soil biology. \
                 Practices that build it also sequester carbon and can earn credits.",
            )
            .with_action(
                "Incorporate compost or farmyard manure, retain crop residue and plant a \
                 cover crop after harvest.",
            )
        } else {
            Recommendation::new(
                rule_id(eval),
                RecommendationCategory::SoilHealth,
                severity,
                "High Organic Matter",
                format!("Organic matter ({}) is above the ideal range of {}.", current, ideal),
            )
            .with_explanation(
                "Very high organic matter can tie up nitrogen while it decomposes and keep \
                 soil wet for longer.",
            )
            .with_action("Reduce manure additions and watch for nitrogen deficiency signs.")
        }
    }

    fn salinity(eval: &EvaluationResult, severity: Severity) -> Recommendation {
        let current = format_value(eval.metric, eval.value);
        let ideal = format_range(eval);
        if eval.is_below() {
            Recommendation::new(
                rule_id(eval),
                RecommendationCategory::SoilHealth,
                severity,
                "Low Soil Salinity",
                format!(
                    "Electrical conductivity ({}) is below the ideal range of {}.",
                    current, ideal
                ),
            )
            .with_explanation(
                "Very low conductivity usually means few dissolved nutrients in the root zone.",
            )
            .with_action("Check fertility with a full soil test before the next application.")
        } else {
            Recommendation::new(
                rule_id(eval),
                RecommendationCategory::SoilHealth,
                severity,
                "High Soil Salinity",
                format!(
                    "Electrical conductivity ({}) is above the ideal range of {}.",
                    current, ideal
                ),
            )
            .with_explanation(
                "Salt build-up makes it harder for roots to draw water, causing drought \
                 symptoms even in moist soil.",
            )
            .with_action(
                "Leach salts with a heavy irrigation where drainage allows, and switch to \
                 low-salt fertilizers.",
            )
        }
    }
}

impl Rule for SoilHealthRule {
    fn id(&self) -> &'static str {
        "soil_health"
    }

    fn name(&self) -> &'static str {
        "Soil Health"
    }

    fn metrics(&self) -> &'static [Metric] {
        &[Metric::OrganicMatter, Metric::ElectricalConductivity]
    }

    fn advise(&self, eval: &EvaluationResult, severity: Severity) -> Recommendation {
        let rec = match eval.metric {
            Metric::OrganicMatter => Self::organic_matter(eval, severity),
            _ => Self::salinity(eval, severity),
        };
        rec.for_metric(eval.metric)
            .with_data_point(eval.metric.as_str(), format_value(eval.metric, eval.value), "Soil Probe")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Classification, IdealRange};

    fn reading(metric: Metric, value: f64, min: f64, max: f64) -> EvaluationResult {
        let range = IdealRange { min, max };
        EvaluationResult {
            metric,
            value,
            classification: Classification::High,
            is_ideal: false,
            ideal_range: range,
            deviation: range.deviation(value),
        }
    }

    #[test]
    fn saline_soil() {
        let rec = SoilHealthRule.advise(
            &reading(Metric::ElectricalConductivity, 1.6, 0.5, 1.0),
            Severity::Watch,
        );
        assert_eq!(rec.title, "High Soil Salinity");
        assert!(rec.description.contains("dS/m"));
    }

    #[test]
    fn low_organic_matter() {
        let rec =
            SoilHealthRule.advise(&reading(Metric::OrganicMatter, 1.2, 2.0, 4.0), Severity::Watch);
        assert_eq!(rec.title, "Build Soil Organic Matter");
        assert_eq!(rec.id, "organicmatter_low");
    }
}
