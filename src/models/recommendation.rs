use super::telemetry::Metric;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendationCategory {
    Irrigation,
    SoilAmendment,
    Fertilizer,
    SoilHealth,
    HeatStress,
    Weather,
    CarbonCredit,
    General,
}

impl RecommendationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationCategory::Irrigation => "Irrigation",
            RecommendationCategory::SoilAmendment => "Soil Amendment",
            RecommendationCategory::Fertilizer => "Fertilizer",
            RecommendationCategory::SoilHealth => "Soil Health",
            RecommendationCategory::HeatStress => "Heat Stress",
            RecommendationCategory::Weather => "Weather",
            RecommendationCategory::CarbonCredit => "Carbon Credit",
            RecommendationCategory::General => "General",
        }
    }
}

impl std::fmt::Display for RecommendationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordered so that `Action > Watch > Info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Watch,
    Action,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Watch => "Watch",
            Severity::Action => "Action",
        }
    }

    /// Severity for a reading that sits `relative` range-widths outside its ideal range.
    pub fn from_relative_deviation(relative: f64) -> Self {
        if relative > 1.0 {
            Severity::Action
        } else if relative > 0.25 {
            Severity::Watch
        } else {
            Severity::Info
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub label: String,
    pub value: String,
    pub source: String,
}

impl DataPoint {
    pub fn new(label: &str, value: impl std::fmt::Display, source: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            source: source.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    pub category: RecommendationCategory,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub explanation: String,
    pub related_metric: Option<Metric>,
    pub data_points: Vec<DataPoint>,
    pub suggested_action: Option<String>,
}

impl Recommendation {
    pub fn new(
        id: impl Into<String>,
        category: RecommendationCategory,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            severity,
            title: title.into(),
            description: description.into(),
            explanation: String::new(),
            related_metric: None,
            data_points: Vec::new(),
            suggested_action: None,
        }
    }

    pub fn for_metric(mut self, metric: Metric) -> Self {
        self.related_metric = Some(metric);
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn with_data_point(
        mut self,
        label: &str,
        value: impl std::fmt::Display,
        source: &str,
    ) -> Self {
        self.data_points.push(DataPoint::new(label, value, source));
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.suggested_action = Some(action.into());
        self
    }
}
