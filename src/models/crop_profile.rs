use super::telemetry::Metric;
use crate::error::{FarmOpsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Closed interval `[min, max]` considered healthy for a crop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdealRange {
    pub min: f64,
    pub max: f64,
}

impl IdealRange {
    pub fn new(metric: Metric, min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(FarmOpsError::InvalidRange { metric, min, max });
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Signed distance outside the range: negative below, positive above, zero inside.
    pub fn deviation(&self, value: f64) -> f64 {
        if value < self.min {
            value - self.min
        } else if value > self.max {
            value - self.max
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Nutrient {
    Nitrogen,
    Phosphorus,
    Potassium,
}

impl Nutrient {
    pub fn metric(&self) -> Metric {
        match self {
            Nutrient::Nitrogen => Metric::Nitrogen,
            Nutrient::Phosphorus => Metric::Phosphorus,
            Nutrient::Potassium => Metric::Potassium,
        }
    }

    pub fn from_metric(metric: Metric) -> Option<Self> {
        match metric {
            Metric::Nitrogen => Some(Nutrient::Nitrogen),
            Metric::Phosphorus => Some(Nutrient::Phosphorus),
            Metric::Potassium => Some(Nutrient::Potassium),
            _ => None,
        }
    }

    pub fn all() -> &'static [Nutrient] {
        &[Nutrient::Nitrogen, Nutrient::Phosphorus, Nutrient::Potassium]
    }
}

impl std::fmt::Display for Nutrient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.metric().as_str())
    }
}

/// How much of a nutrient a crop needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NutrientLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl NutrientLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientLevel::Low => "Low",
            NutrientLevel::Medium => "Medium",
            NutrientLevel::High => "High",
            NutrientLevel::VeryHigh => "Very High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', ' ', '_'], "").as_str() {
            "low" => Some(NutrientLevel::Low),
            "medium" | "med" => Some(NutrientLevel::Medium),
            "high" => Some(NutrientLevel::High),
            "veryhigh" => Some(NutrientLevel::VeryHigh),
            _ => None,
        }
    }

    /// Minimum soil level (0-100 scale) that satisfies this requirement.
    pub fn threshold(&self) -> f64 {
        match self {
            NutrientLevel::Low => 20.0,
            NutrientLevel::Medium => 50.0,
            NutrientLevel::High => 70.0,
            NutrientLevel::VeryHigh => 85.0,
        }
    }
}

impl std::fmt::Display for NutrientLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropProfile {
    pub crop_id: String,
    pub name: String,
    #[serde(default)]
    pub ideal_ranges: BTreeMap<Metric, IdealRange>,
    #[serde(default)]
    pub nutrient_requirements: BTreeMap<Nutrient, NutrientLevel>,
}

impl CropProfile {
    pub fn new(crop_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            crop_id: crop_id.into(),
            name: name.into(),
            ideal_ranges: BTreeMap::new(),
            nutrient_requirements: BTreeMap::new(),
        }
    }

    pub fn with_range(mut self, metric: Metric, min: f64, max: f64) -> Result<Self> {
        self.ideal_ranges
            .insert(metric, IdealRange::new(metric, min, max)?);
        Ok(self)
    }

    pub fn with_requirement(mut self, nutrient: Nutrient, level: NutrientLevel) -> Self {
        self.nutrient_requirements.insert(nutrient, level);
        self
    }

    pub fn ideal_range(&self, metric: Metric) -> Result<IdealRange> {
        self.ideal_ranges
            .get(&metric)
            .copied()
            .ok_or_else(|| FarmOpsError::UnknownMetricForProfile {
                crop_id: self.crop_id.clone(),
                metric,
            })
    }

    /// Re-checks every range; profiles loaded through serde skip `IdealRange::new`.
    pub fn validate(&self) -> Result<()> {
        for (metric, range) in &self.ideal_ranges {
            IdealRange::new(*metric, range.min, range.max)?;
        }
        Ok(())
    }
}
