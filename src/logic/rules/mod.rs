pub mod carbon;
pub mod engine;
pub mod fertilizer;
pub mod heat_stress;
pub mod irrigation;
pub mod soil_health;
pub mod soil_ph;
pub mod weather;

pub use carbon::carbon_recommendations;
pub use engine::{recommend, RulesEngine};

use crate::models::{EvaluationResult, Metric, Recommendation, Severity};

/// Trait for agronomic advice rules. Each rule owns the advice for a fixed
/// set of metrics and is only consulted for readings outside the ideal range.
pub trait Rule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Metrics this rule gives advice for
    fn metrics(&self) -> &'static [Metric];

    /// Build the single recommendation for an out-of-range evaluation
    fn advise(&self, eval: &EvaluationResult, severity: Severity) -> Recommendation;
}

/// `"moisture_low"` / `"ph_high"` style ids shared by the metric rules.
pub(crate) fn rule_id(eval: &EvaluationResult) -> String {
    let direction = if eval.is_below() { "low" } else { "high" };
    let metric = format!("{:?}", eval.metric).to_lowercase();
    format!("{}_{}", metric, direction)
}

pub(crate) fn format_value(metric: Metric, value: f64) -> String {
    match metric.unit() {
        "" => format!("{:.1}", value),
        unit => format!("{:.1}{}", value, unit),
    }
}

pub(crate) fn format_range(eval: &EvaluationResult) -> String {
    format!(
        "{}-{}",
        format_value(eval.metric, eval.ideal_range.min),
        format_value(eval.metric, eval.ideal_range.max)
    )
}
