use crate::models::Metric;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FarmOpsError {
    #[error("Crop profile '{crop_id}' has no ideal range for {metric}")]
    UnknownMetricForProfile { crop_id: String, metric: Metric },

    #[error("No {metric} samples for farm '{farm_id}' in the requested window")]
    InsufficientData { farm_id: String, metric: Metric },

    #[error("No metrics in common between aggregates and crop profile '{crop_id}'")]
    NoComparableMetrics { crop_id: String },

    #[error("Invalid amount for activity '{activity_id}': {amount} tons")]
    InvalidAmount { activity_id: String, amount: f64 },

    #[error("Invalid annual target: {0} (must be greater than zero)")]
    InvalidTarget(f64),

    #[error("Invalid window: start {start} is after end {end}")]
    InvalidWindow { start: String, end: String },

    #[error("Invalid ideal range for {metric}: [{min}, {max}]")]
    InvalidRange { metric: Metric, min: f64, max: f64 },

    #[error("Non-finite {metric} value {value} for farm '{farm_id}'")]
    InvalidValue {
        farm_id: String,
        metric: Metric,
        value: f64,
    },

    #[error("Duplicate {metric} sample for farm '{farm_id}' at {timestamp}")]
    DuplicateSample {
        farm_id: String,
        metric: Metric,
        timestamp: String,
    },

    #[error("Activity '{0}' is already recorded")]
    DuplicateActivity(String),

    #[error("Activity '{0}' is verified and can no longer be amended")]
    ActivityLocked(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, FarmOpsError>;
