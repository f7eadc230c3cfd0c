use super::evaluation::{EvaluationResult, NutrientFinding, SuitabilityScore, WindowAggregate};
use super::recommendation::Recommendation;
use super::telemetry::{Metric, TimeWindow, Trend};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the presentation layer needs for one farm and crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmReport {
    pub farm_id: String,
    pub crop_id: String,
    pub window: TimeWindow,
    /// Latest reading per metric, classified against the crop profile
    pub evaluations: Vec<EvaluationResult>,
    pub aggregates: BTreeMap<Metric, WindowAggregate>,
    pub suitability: SuitabilityScore,
    pub nutrients: Vec<NutrientFinding>,
    pub trends: BTreeMap<Metric, Trend>,
    pub recommendations: Vec<Recommendation>,
    /// Metrics with telemetry but no ideal range in the crop profile
    pub skipped_metrics: Vec<Metric>,
}

impl FarmReport {
    pub fn deficient_nutrients(&self) -> impl Iterator<Item = &NutrientFinding> {
        self.nutrients.iter().filter(|n| n.is_deficient())
    }

    pub fn out_of_range(&self) -> impl Iterator<Item = &EvaluationResult> {
        self.evaluations.iter().filter(|e| !e.is_ideal)
    }
}
