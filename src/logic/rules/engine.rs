use super::{
    fertilizer::FertilizerRule, heat_stress::HeatStressRule, irrigation::IrrigationRule,
    soil_health::SoilHealthRule, soil_ph::SoilPhRule, weather::WeatherRule, Rule,
};
use crate::models::{EvaluationResult, Metric, Recommendation, Severity, SuitabilityScore};
use std::collections::BTreeMap;
use tracing::warn;

pub struct RulesEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl RulesEngine {
    pub fn new() -> Self {
        let rules: Vec<Box<dyn Rule>> = vec![
            Box::new(IrrigationRule),
            Box::new(SoilPhRule),
            Box::new(FertilizerRule),
            Box::new(SoilHealthRule),
            Box::new(HeatStressRule),
            Box::new(WeatherRule),
        ];

        Self { rules }
    }

    fn rule_for(&self, metric: Metric) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|r| r.metrics().contains(&metric))
            .map(|r| r.as_ref())
    }

    /// One recommendation per out-of-range metric, most urgent first.
    ///
    /// Severity breaks first, then the metric's component score (worst
    /// first), then metric order. Metrics without an evaluation never
    /// produce advice.
    pub fn recommend(
        &self,
        evaluations: &[EvaluationResult],
        score: &SuitabilityScore,
    ) -> Vec<Recommendation> {
        // Keep the furthest-out reading when a metric appears more than once
        let mut worst: BTreeMap<Metric, &EvaluationResult> = BTreeMap::new();
        for eval in evaluations.iter().filter(|e| !e.is_ideal) {
            match worst.get(&eval.metric) {
                Some(existing) if existing.relative_deviation() >= eval.relative_deviation() => {}
                _ => {
                    worst.insert(eval.metric, eval);
                }
            }
        }

        let mut ranked: Vec<(f64, Metric, Recommendation)> = worst
            .into_values()
            .filter_map(|eval| {
                let Some(rule) = self.rule_for(eval.metric) else {
                    warn!(metric = %eval.metric, "No advice rule covers metric");
                    return None;
                };
                let severity = Severity::from_relative_deviation(eval.relative_deviation());
                let component = score.component(eval.metric).unwrap_or(100.0);
                Some((component, eval.metric, rule.advise(eval, severity)))
            })
            .collect();

        ranked.sort_by(|(score_a, metric_a, rec_a), (score_b, metric_b, rec_b)| {
            rec_b
                .severity
                .cmp(&rec_a.severity)
                .then(score_a.total_cmp(score_b))
                .then(metric_a.cmp(metric_b))
        });

        ranked.into_iter().map(|(_, _, rec)| rec).collect()
    }

    pub fn list_rules(&self) -> Vec<(&'static str, &'static str)> {
        self.rules.iter().map(|r| (r.id(), r.name())).collect()
    }
}

impl Default for RulesEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience wrapper over a default `RulesEngine`.
pub fn recommend(evaluations: &[EvaluationResult], score: &SuitabilityScore) -> Vec<Recommendation> {
    RulesEngine::new().recommend(evaluations, score)
}
