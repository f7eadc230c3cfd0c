use super::{format_range, format_value, rule_id, Rule};
use crate::models::{
    EvaluationResult, Metric, Recommendation, RecommendationCategory, Severity,
};

/// Humidity, wind and rainfall advice. These come from the weather feed and
/// mostly change how field work is scheduled rather than what is applied.
pub struct WeatherRule;

impl WeatherRule {
    fn text(eval: &EvaluationResult) -> (&'static str, &'static str, &'static str) {
        match (eval.metric, eval.is_below()) {
            (Metric::Humidity, false) => (
                "High Humidity - Disease Risk",
                "Sustained high humidity favours fungal diseases such as rust and blight.",
                "Scout for leaf spots, avoid evening irrigation and keep a preventative \
                 fungicide ready.",
            ),
            (Metric::Humidity, true) => (
                "Low Humidity",
                "Dry air increases transpiration, so the crop draws down soil moisture faster.",
                "Shorten the irrigation interval and irrigate early in the day.",
            ),
            (Metric::WindSpeed, false) => (
                "High Winds",
                "Strong wind causes spray drift, lodging and rapid soil drying.",
                "Postpone spraying and fertilizer broadcasting until winds drop.",
            ),
            (Metric::WindSpeed, true) => (
                "Still Air",
                "Very still air slows drying of wet foliage and can trap cold air at night.",
                "Watch for dew-related disease and frost pockets in low-lying fields.",
            ),
            (_, false) => (
                "Heavy Rainfall",
                "Excess rain waterlogs fields and washes applied nutrients out of reach.",
                "Skip irrigation, clear drainage channels and delay fertilizer until soil drains.",
            ),
            (_, true) => (
                "Below-Normal Rainfall",
                "Rainfall below the crop's needs must be made up by irrigation.",
                "Plan supplementary irrigation and track soil moisture daily.",
            ),
        }
    }
}

impl Rule for WeatherRule {
    fn id(&self) -> &'static str {
        "weather"
    }

    fn name(&self) -> &'static str {
        "Weather Conditions"
    }

    fn metrics(&self) -> &'static [Metric] {
        &[Metric::Humidity, Metric::WindSpeed, Metric::Precipitation]
    }

    fn advise(&self, eval: &EvaluationResult, severity: Severity) -> Recommendation {
        let (title, explanation, action) = Self::text(eval);
        let current = format_value(eval.metric, eval.value);
        let ideal = format_range(eval);
        let direction = if eval.is_below() { "below" } else { "above" };

        Recommendation::new(
            rule_id(eval),
            RecommendationCategory::Weather,
            severity,
            title,
            format!(
                "{} ({}) is {} the ideal range of {}.",
                eval.metric, current, direction, ideal
            ),
        )
        .for_metric(eval.metric)
        .with_explanation(explanation)
        .with_action(action)
        .with_data_point(eval.metric.as_str(), current, "Weather Feed")
    }
}
