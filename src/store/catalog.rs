use crate::error::{FarmOpsError, Result};
use crate::models::{CropProfile, Metric, Nutrient, NutrientLevel};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Crop profiles keyed by crop id. Reference data: profiles are replaced
/// wholesale on re-registration, never edited in place.
#[derive(Debug, Clone, Default)]
pub struct CropRegistry {
    profiles: BTreeMap<String, CropProfile>,
}

impl CropRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field crops with the ranges used across the farm dashboard.
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();
        registry.register(
            baseline("wheat", "Wheat")?
                .with_range(Metric::Ph, 6.0, 7.5)?
                .with_range(Metric::Moisture, 60.0, 80.0)?
                .with_range(Metric::Temperature, 15.0, 24.0)?
                .with_requirement(Nutrient::Nitrogen, NutrientLevel::High)
                .with_requirement(Nutrient::Phosphorus, NutrientLevel::Medium)
                .with_requirement(Nutrient::Potassium, NutrientLevel::Medium),
        )?;
        registry.register(
            baseline("rice", "Rice")?
                .with_range(Metric::Ph, 5.5, 6.5)?
                .with_range(Metric::Moisture, 70.0, 90.0)?
                .with_range(Metric::Temperature, 20.0, 35.0)?
                .with_requirement(Nutrient::Nitrogen, NutrientLevel::High)
                .with_requirement(Nutrient::Phosphorus, NutrientLevel::Medium)
                .with_requirement(Nutrient::Potassium, NutrientLevel::Medium),
        )?;
        registry.register(
            baseline("maize", "Maize")?
                .with_range(Metric::Ph, 5.8, 7.0)?
                .with_range(Metric::Moisture, 65.0, 75.0)?
                .with_range(Metric::Temperature, 20.0, 30.0)?
                .with_requirement(Nutrient::Nitrogen, NutrientLevel::High)
                .with_requirement(Nutrient::Phosphorus, NutrientLevel::High)
                .with_requirement(Nutrient::Potassium, NutrientLevel::Medium),
        )?;
        registry.register(
            baseline("cotton", "Cotton")?
                .with_range(Metric::Ph, 6.0, 7.2)?
                .with_range(Metric::Moisture, 50.0, 70.0)?
                .with_range(Metric::Temperature, 20.0, 30.0)?
                .with_requirement(Nutrient::Nitrogen, NutrientLevel::Medium)
                .with_requirement(Nutrient::Phosphorus, NutrientLevel::High)
                .with_requirement(Nutrient::Potassium, NutrientLevel::Medium),
        )?;
        registry.register(
            baseline("sugarcane", "Sugarcane")?
                .with_range(Metric::Ph, 6.0, 7.5)?
                .with_range(Metric::Moisture, 70.0, 85.0)?
                .with_range(Metric::Temperature, 22.0, 35.0)?
                .with_requirement(Nutrient::Nitrogen, NutrientLevel::VeryHigh)
                .with_requirement(Nutrient::Phosphorus, NutrientLevel::High)
                .with_requirement(Nutrient::Potassium, NutrientLevel::High),
        )?;
        registry.register(
            baseline("soybean", "Soybean")?
                .with_range(Metric::Ph, 6.0, 7.0)?
                .with_range(Metric::Moisture, 60.0, 70.0)?
                .with_range(Metric::Temperature, 20.0, 30.0)?
                .with_requirement(Nutrient::Nitrogen, NutrientLevel::Low)
                .with_requirement(Nutrient::Phosphorus, NutrientLevel::Medium)
                .with_requirement(Nutrient::Potassium, NutrientLevel::Medium),
        )?;
        registry.register(
            baseline("potato", "Potato")?
                .with_range(Metric::Ph, 5.5, 6.5)?
                .with_range(Metric::Moisture, 65.0, 75.0)?
                .with_range(Metric::Temperature, 15.0, 25.0)?
                .with_requirement(Nutrient::Nitrogen, NutrientLevel::Medium)
                .with_requirement(Nutrient::Phosphorus, NutrientLevel::High)
                .with_requirement(Nutrient::Potassium, NutrientLevel::High),
        )?;
        Ok(registry)
    }

    pub fn register(&mut self, profile: CropProfile) -> Result<()> {
        profile.validate()?;
        if self.profiles.contains_key(&profile.crop_id) {
            info!(crop_id = %profile.crop_id, "Replacing crop profile");
        }
        self.profiles.insert(profile.crop_id.clone(), profile);
        Ok(())
    }

    pub fn get(&self, crop_id: &str) -> Result<&CropProfile> {
        self.profiles
            .get(crop_id)
            .ok_or_else(|| FarmOpsError::NotFound(format!("crop profile '{}'", crop_id)))
    }

    pub fn list(&self) -> Vec<&CropProfile> {
        self.profiles.values().collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Registers every profile in a YAML list, overriding existing ids.
    /// Nothing is registered unless every profile in the list is valid.
    pub fn extend_from_yaml_str(&mut self, yaml: &str) -> Result<usize> {
        let profiles: Vec<CropProfile> = serde_yaml::from_str(yaml)?;
        for profile in &profiles {
            profile.validate()?;
        }
        let count = profiles.len();
        for profile in profiles {
            self.register(profile)?;
        }
        debug!(count, "Loaded crop profiles from YAML");
        Ok(count)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let mut registry = Self::new();
        registry.extend_from_yaml_str(yaml)?;
        Ok(registry)
    }

    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path)?;
        self.extend_from_yaml_str(&content)
    }
}

/// Soil and weather ranges shared by the built-in field crops.
fn baseline(crop_id: &str, name: &str) -> Result<CropProfile> {
    CropProfile::new(crop_id, name)
        .with_range(Metric::Nitrogen, 40.0, 60.0)?
        .with_range(Metric::Phosphorus, 25.0, 45.0)?
        .with_range(Metric::Potassium, 20.0, 40.0)?
        .with_range(Metric::OrganicMatter, 2.0, 4.0)?
        .with_range(Metric::ElectricalConductivity, 0.5, 1.0)?
        .with_range(Metric::Humidity, 40.0, 80.0)
}
