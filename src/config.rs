use crate::error::{FarmOpsError, Result};
use crate::models::ReportingPeriod;
use crate::store::CropRegistry;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub farm: FarmConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Extra crop profiles (YAML list) layered over the built-in catalog
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FarmConfig {
    pub farm_id: String,
    pub crop_id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EvaluationConfig {
    #[serde(default = "default_window_hours")]
    pub window_hours: i64,
}

/// Ten years of hourly samples.
pub const MAX_WINDOW_HOURS: i64 = 24 * 366 * 10;

fn default_window_hours() -> i64 {
    168
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            window_hours: default_window_hours(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LedgerConfig {
    #[serde(default = "default_annual_target")]
    pub annual_target_tons: f64,
    #[serde(default = "default_credit_price")]
    pub credit_price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Calendar year to report on; omitted means "span of verified activity"
    #[serde(default)]
    pub reporting_year: Option<i32>,
}

fn default_annual_target() -> f64 {
    50.0
}

fn default_credit_price() -> f64 {
    750.0
}

fn default_currency() -> String {
    "INR".into()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            annual_target_tons: default_annual_target(),
            credit_price: default_credit_price(),
            currency: default_currency(),
            reporting_year: None,
        }
    }
}

impl LedgerConfig {
    pub fn reporting_period(&self) -> Option<ReportingPeriod> {
        self.reporting_year.map(ReportingPeriod::year)
    }
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(FarmOpsError::Config(format!(
                "Config file not found at {:?}",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| FarmOpsError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_yaml_str(&config_str)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // Substitute environment variables
        let content = Self::substitute_env_vars(content)?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| FarmOpsError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;

        Ok(config)
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let default_path = dirs::config_dir()
            .ok_or_else(|| FarmOpsError::Config("Cannot determine config directory".into()))?
            .join("farmops")
            .join("config.yaml");
        Ok(default_path)
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.farm.farm_id.trim().is_empty() {
            return Err(FarmOpsError::Config("farm.farm_id must not be empty".into()));
        }
        if self.evaluation.window_hours <= 0 || self.evaluation.window_hours > MAX_WINDOW_HOURS {
            return Err(FarmOpsError::Config(format!(
                "evaluation.window_hours must be between 1 and {}, got {}",
                MAX_WINDOW_HOURS, self.evaluation.window_hours
            )));
        }
        if !self.ledger.annual_target_tons.is_finite() || self.ledger.annual_target_tons <= 0.0 {
            return Err(FarmOpsError::InvalidTarget(self.ledger.annual_target_tons));
        }
        if !self.ledger.credit_price.is_finite() || self.ledger.credit_price < 0.0 {
            return Err(FarmOpsError::Config(format!(
                "ledger.credit_price must not be negative, got {}",
                self.ledger.credit_price
            )));
        }
        Ok(())
    }

    /// Built-in crop profiles plus anything in `catalog_path`.
    pub fn crop_registry(&self) -> Result<CropRegistry> {
        let mut registry = CropRegistry::builtin()?;
        if let Some(ref path) = self.catalog_path {
            let count = registry.load_file(path)?;
            tracing::info!(count, path = %path.display(), "Loaded crop catalog");
        }
        Ok(registry)
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        // Find all ${VAR_NAME} patterns and substitute
        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| FarmOpsError::Config(format!("Invalid substitution pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            farm: FarmConfig {
                farm_id: "farm1".into(),
                crop_id: "wheat".into(),
            },
            evaluation: EvaluationConfig::default(),
            ledger: LedgerConfig::default(),
            catalog_path: None,
        }
    }
}
