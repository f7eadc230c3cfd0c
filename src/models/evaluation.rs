use super::crop_profile::{IdealRange, Nutrient, NutrientLevel};
use super::telemetry::Metric;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Status label for a single reading. pH uses the soil-reaction bands,
/// every other metric the Low/Optimal/High bands of the crop profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    Low,
    Optimal,
    High,
    Acidic,
    Neutral,
    Alkaline,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Low => "Low",
            Classification::Optimal => "Optimal",
            Classification::High => "High",
            Classification::Acidic => "Acidic",
            Classification::Neutral => "Neutral",
            Classification::Alkaline => "Alkaline",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub metric: Metric,
    pub value: f64,
    pub classification: Classification,
    pub is_ideal: bool,
    pub ideal_range: IdealRange,
    /// Signed distance outside `ideal_range`, zero when inside.
    pub deviation: f64,
}

impl EvaluationResult {
    /// Deviation expressed in multiples of the ideal range width.
    pub fn relative_deviation(&self) -> f64 {
        let width = self.ideal_range.width();
        let scale = if width > 0.0 {
            width
        } else {
            self.ideal_range.min.abs().max(self.ideal_range.max.abs()).max(1.0)
        };
        self.deviation.abs() / scale
    }

    pub fn is_below(&self) -> bool {
        self.deviation < 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NutrientStatus {
    Low,
    Optimal,
}

impl NutrientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientStatus::Low => "Low",
            NutrientStatus::Optimal => "Optimal",
        }
    }
}

impl std::fmt::Display for NutrientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientFinding {
    pub nutrient: Nutrient,
    pub level: f64,
    pub requirement: NutrientLevel,
    pub status: NutrientStatus,
}

impl NutrientFinding {
    pub fn is_deficient(&self) -> bool {
        self.status == NutrientStatus::Low
    }
}

/// min/avg/max over a closed time window. `min <= avg <= max` and
/// `sample_count >= 1` always hold for a constructed aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowAggregate {
    pub farm_id: String,
    pub metric: Metric,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub sample_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuitabilityScore {
    pub crop_id: String,
    pub farm_id: String,
    pub score: f64,
    pub component_scores: BTreeMap<Metric, f64>,
}

impl SuitabilityScore {
    pub fn component(&self, metric: Metric) -> Option<f64> {
        self.component_scores.get(&metric).copied()
    }

    pub fn rating(&self) -> &'static str {
        if self.score >= 80.0 {
            "Excellent"
        } else if self.score >= 60.0 {
            "Good"
        } else if self.score >= 40.0 {
            "Fair"
        } else {
            "Poor"
        }
    }
}
