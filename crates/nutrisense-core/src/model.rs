use crate::error::NutriError;
use crate::parsing::normalize::{derive_lookup_key, nutrient_for_key};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Ordinal severity of a deficiency, plus the two indeterminate states the
/// service reports when it cannot grade one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SeverityLevel {
    Mild,
    Moderate,
    Severe,
    NotApplicable,
    Unknown,
}

impl SeverityLevel {
    pub const GRADED: [SeverityLevel; 3] = [
        SeverityLevel::Mild,
        SeverityLevel::Moderate,
        SeverityLevel::Severe,
    ];

    /// Map any label to a level. Never fails: unrecognized labels are `Unknown`.
    pub fn from_label(s: &str) -> SeverityLevel {
        match s.trim().to_lowercase().as_str() {
            "mild" => SeverityLevel::Mild,
            "moderate" => SeverityLevel::Moderate,
            "severe" => SeverityLevel::Severe,
            "not applicable" | "not_applicable" | "n/a" => SeverityLevel::NotApplicable,
            _ => SeverityLevel::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityLevel::Mild => "Mild",
            SeverityLevel::Moderate => "Moderate",
            SeverityLevel::Severe => "Severe",
            SeverityLevel::NotApplicable => "Not Applicable",
            SeverityLevel::Unknown => "Unknown",
        }
    }

    pub fn is_graded(&self) -> bool {
        Self::GRADED.contains(self)
    }
}

impl From<String> for SeverityLevel {
    fn from(s: String) -> Self {
        SeverityLevel::from_label(&s)
    }
}

impl From<SeverityLevel> for String {
    fn from(level: SeverityLevel) -> Self {
        level.as_str().to_string()
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nutrients the agronomy table carries treatments for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Nutrient {
    Nitrogen,
    Phosphorus,
    Potassium,
    Magnesium,
    Iron,
}

impl Nutrient {
    pub const ALL: [Nutrient; 5] = [
        Nutrient::Nitrogen,
        Nutrient::Phosphorus,
        Nutrient::Potassium,
        Nutrient::Magnesium,
        Nutrient::Iron,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Nutrient::Nitrogen => "N",
            Nutrient::Phosphorus => "P",
            Nutrient::Potassium => "K",
            Nutrient::Magnesium => "Mg",
            Nutrient::Iron => "Fe",
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Nutrient::Nitrogen => "Nitrogen",
            Nutrient::Phosphorus => "Phosphorus",
            Nutrient::Potassium => "Potassium",
            Nutrient::Magnesium => "Magnesium",
            Nutrient::Iron => "Iron",
        };
        f.write_str(name)
    }
}

/// A predicted deficiency label mapped onto the nutrients we know about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "label", rename_all = "snake_case")]
pub enum Deficiency {
    Known(Nutrient),
    /// A real deficiency label with no table entry (e.g. "Zinc").
    Unmapped(String),
    /// The service could not determine a deficiency ("Unknown", "Healthy/Unknown").
    Undetermined,
}

impl Deficiency {
    /// Total mapping from a raw service label. Never fails.
    pub fn from_label(raw: &str) -> Deficiency {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("unknown")
            || trimmed.eq_ignore_ascii_case("healthy/unknown")
        {
            return Deficiency::Undetermined;
        }

        let key = derive_lookup_key(trimmed);
        match nutrient_for_key(&key) {
            Some(n) => Deficiency::Known(n),
            None => Deficiency::Unmapped(key),
        }
    }

    pub fn is_determined(&self) -> bool {
        !matches!(self, Deficiency::Undetermined)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SoilType {
    Loamy,
    Clay,
    Sandy,
    Silty,
    Peaty,
    Chalky,
}

impl SoilType {
    pub const ALL: [SoilType; 6] = [
        SoilType::Loamy,
        SoilType::Clay,
        SoilType::Sandy,
        SoilType::Silty,
        SoilType::Peaty,
        SoilType::Chalky,
    ];

    pub fn from_str_loose(s: &str) -> Option<SoilType> {
        let lower = s.trim().to_lowercase();
        let lower = lower.strip_suffix(" soil").unwrap_or(&lower);
        match lower {
            "loamy" | "loam" => Some(SoilType::Loamy),
            "clay" | "clayey" => Some(SoilType::Clay),
            "sandy" | "sand" => Some(SoilType::Sandy),
            "silty" | "silt" => Some(SoilType::Silty),
            "peaty" | "peat" => Some(SoilType::Peaty),
            "chalky" | "chalk" => Some(SoilType::Chalky),
            _ => None,
        }
    }
}

impl fmt::Display for SoilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SoilType::Loamy => "Loamy",
            SoilType::Clay => "Clay",
            SoilType::Sandy => "Sandy",
            SoilType::Silty => "Silty",
            SoilType::Peaty => "Peaty",
            SoilType::Chalky => "Chalky",
        };
        f.write_str(name)
    }
}

impl FromStr for SoilType {
    type Err = NutriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SoilType::from_str_loose(s).ok_or_else(|| {
            let names: Vec<String> = SoilType::ALL.iter().map(|t| t.to_string()).collect();
            NutriError::Config(format!(
                "unknown soil type '{}'. Available: {}",
                s,
                names.join(", ")
            ))
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantPrediction {
    #[serde(rename = "type")]
    pub kind: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeficiencyPrediction {
    #[serde(rename = "type")]
    pub kind: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DeficiencyPrediction {
    pub fn deficiency(&self) -> Deficiency {
        Deficiency::from_label(&self.kind)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeverityPrediction {
    pub level: SeverityLevel,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentalAnalysis {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoilAnalysis {
    #[serde(default)]
    pub soil_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default)]
    pub treatment: Option<String>,
    /// Guideline document echoed by the service; shape is not fixed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guidelines: Option<serde_json::Value>,
}

/// Structured response of the prediction endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub plant: PlantPrediction,
    pub deficiency: DeficiencyPrediction,
    pub severity: SeverityPrediction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environmental_analysis: Option<EnvironmentalAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_analysis: Option<SoilAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzed_by: Option<String>,
}

impl PredictionResult {
    /// Treatment text supplied by the service, if any non-blank one was sent.
    pub fn service_treatment(&self) -> Option<&str> {
        self.recommendation
            .as_ref()
            .and_then(|r| r.treatment.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedPlant {
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CropConditions {
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub rainfall: Option<f64>,
    #[serde(default)]
    pub ph: Option<f64>,
}

/// Response of the crop-by-location endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropPrediction {
    pub plants: Vec<SuggestedPlant>,
    #[serde(default)]
    pub metadata: CropConditions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Lowercase location name -> lowercase plant names grown there.
pub type LocationPlants = BTreeMap<String, Vec<String>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_from_service_labels() {
        assert_eq!(SeverityLevel::from_label("Severe"), SeverityLevel::Severe);
        assert_eq!(SeverityLevel::from_label(" mild "), SeverityLevel::Mild);
        assert_eq!(
            SeverityLevel::from_label("Not Applicable"),
            SeverityLevel::NotApplicable
        );
        assert_eq!(SeverityLevel::from_label("extreme"), SeverityLevel::Unknown);
    }

    #[test]
    fn test_severity_roundtrips_through_json_string() {
        let level: SeverityLevel = serde_json::from_str("\"Not Applicable\"").unwrap();
        assert_eq!(level, SeverityLevel::NotApplicable);
        assert_eq!(serde_json::to_string(&level).unwrap(), "\"Not Applicable\"");
    }

    #[test]
    fn test_deficiency_known_labels() {
        assert_eq!(
            Deficiency::from_label("Nitrogen(N)"),
            Deficiency::Known(Nutrient::Nitrogen)
        );
        assert_eq!(
            Deficiency::from_label("iron-Fe"),
            Deficiency::Known(Nutrient::Iron)
        );
        assert_eq!(
            Deficiency::from_label("magnesium"),
            Deficiency::Known(Nutrient::Magnesium)
        );
    }

    #[test]
    fn test_deficiency_misspelled_potassium() {
        assert_eq!(
            Deficiency::from_label("potasium-K"),
            Deficiency::Known(Nutrient::Potassium)
        );
    }

    #[test]
    fn test_deficiency_undetermined() {
        assert_eq!(Deficiency::from_label("Unknown"), Deficiency::Undetermined);
        assert_eq!(
            Deficiency::from_label("Healthy/Unknown"),
            Deficiency::Undetermined
        );
        assert_eq!(Deficiency::from_label("  "), Deficiency::Undetermined);
    }

    #[test]
    fn test_deficiency_unmapped_keeps_key() {
        assert_eq!(
            Deficiency::from_label("zinc(Zn)"),
            Deficiency::Unmapped("Zinc".into())
        );
    }

    #[test]
    fn test_soil_type_loose_parsing() {
        assert_eq!(SoilType::from_str_loose("loamy"), Some(SoilType::Loamy));
        assert_eq!(SoilType::from_str_loose("Clay soil"), Some(SoilType::Clay));
        assert_eq!(SoilType::from_str_loose("gravel"), None);
        assert!("gravel".parse::<SoilType>().is_err());
    }

    #[test]
    fn test_parse_full_prediction() {
        let json = r#"{
            "plant": {"type": "Rice", "confidence": 0.91},
            "deficiency": {"type": "Nitrogen(N)", "confidence": 0.8, "message": null},
            "severity": {"level": "Moderate", "confidence": 0.7},
            "environmental_analysis": {"location": "Kandy", "temperature": 24.3, "humidity": 81.0, "status": "ok"},
            "soil_analysis": {"soil_type": "Clay", "status": "fine"},
            "recommendation": {"treatment": "Apply urea.", "guidelines": {"a": 1}},
            "timestamp": "2025-03-14 11:51:51",
            "analyzed_by": "someone"
        }"#;
        let r: PredictionResult = serde_json::from_str(json).unwrap();
        assert_eq!(r.plant.kind, "Rice");
        assert_eq!(r.severity.level, SeverityLevel::Moderate);
        assert_eq!(r.deficiency.deficiency(), Deficiency::Known(Nutrient::Nitrogen));
        assert_eq!(r.service_treatment(), Some("Apply urea."));
    }

    #[test]
    fn test_parse_minimal_prediction() {
        let json = r#"{
            "plant": {"type": "Coffee", "confidence": 0.9},
            "deficiency": {"type": "Healthy/Unknown", "confidence": 0.5},
            "severity": {"level": "Not Applicable", "confidence": 1.0}
        }"#;
        let r: PredictionResult = serde_json::from_str(json).unwrap();
        assert!(r.environmental_analysis.is_none());
        assert!(r.service_treatment().is_none());
        assert!(!r.deficiency.deficiency().is_determined());
    }

    #[test]
    fn test_blank_service_treatment_is_ignored() {
        let json = r#"{
            "plant": {"type": "Rice", "confidence": 0.9},
            "deficiency": {"type": "Iron", "confidence": 0.9},
            "severity": {"level": "Mild", "confidence": 0.9},
            "recommendation": {"treatment": "   "}
        }"#;
        let r: PredictionResult = serde_json::from_str(json).unwrap();
        assert!(r.service_treatment().is_none());
    }
}
