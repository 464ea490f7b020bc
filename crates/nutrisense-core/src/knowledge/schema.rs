use crate::model::{Nutrient, SeverityLevel, SoilType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Static reference data joined against every prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgronomyTable {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Graded severity levels, mildest first.
    pub severity_levels: Vec<SeverityLevel>,
    pub crops: BTreeMap<String, CropProfile>,
    pub fertilizer_recommendations: BTreeMap<Nutrient, BTreeMap<SeverityLevel, String>>,
    #[serde(default)]
    pub application_guidelines: Vec<GuidelineSection>,
}

/// Everything the table knows about one crop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropProfile {
    pub soil: SoilPreference,
    pub conditions: GrowingConditions,
    pub nutrients: NutrientTargets,
    #[serde(default)]
    pub common_deficiencies: Vec<Nutrient>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoilPreference {
    pub ph_range: [f64; 2],
    pub suitable_soils: Vec<SoilType>,
}

/// Optimal temperature (°C) and relative humidity (%) ranges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowingConditions {
    pub temp_range: [f64; 2],
    pub humidity_range: [f64; 2],
}

/// Recommended nutrient levels in kg/ha.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutrientTargets {
    #[serde(rename = "N")]
    pub nitrogen: u32,
    #[serde(rename = "P")]
    pub phosphorus: u32,
    #[serde(rename = "K")]
    pub potassium: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidelineSection {
    pub title: String,
    pub items: Vec<String>,
}

impl AgronomyTable {
    /// Look up a crop by name, ignoring case ("rice" finds "Rice").
    pub fn crop(&self, name: &str) -> Option<(&str, &CropProfile)> {
        let name = name.trim();
        if let Some((k, v)) = self.crops.get_key_value(name) {
            return Some((k.as_str(), v));
        }
        self.crops
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(k, v)| (k.as_str(), v))
    }

    pub fn treatment(&self, nutrient: Nutrient, severity: SeverityLevel) -> Option<&str> {
        self.fertilizer_recommendations
            .get(&nutrient)
            .and_then(|by_level| by_level.get(&severity))
            .map(String::as_str)
    }
}
