//! Join of a prediction against the agronomy table into a displayable report.

use crate::knowledge::assess::{assess_climate, assess_soil};
use crate::knowledge::schema::{AgronomyTable, CropProfile, GuidelineSection};
use crate::model::{Deficiency, PredictionResult, SeverityLevel, SoilType};
use serde::Serialize;

pub const NO_DATA: &str = "No data available";
pub const NO_RECOMMENDATION: &str = "No specific recommendation available";
pub const NOT_SPECIFIED: &str = "Not specified";

/// Format a [0,1] confidence as a percentage with one decimal: 0.873 -> "87.3%".
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub label: String,
    pub value: String,
    pub confidence: f64,
    pub confidence_display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SummaryRow {
    fn new(label: &str, value: &str, confidence: f64, message: Option<&String>) -> Self {
        SummaryRow {
            label: label.to_string(),
            value: value.to_string(),
            confidence,
            confidence_display: format_confidence(confidence),
            message: message.cloned(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub plant: SummaryRow,
    pub deficiency: SummaryRow,
    pub severity: SummaryRow,
}

impl Summary {
    pub fn rows(&self) -> [&SummaryRow; 3] {
        [&self.plant, &self.deficiency, &self.severity]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentSection {
    pub location: String,
    pub temperature: String,
    pub humidity: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SoilSection {
    pub selected: String,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TreatmentSource {
    /// Sent by the prediction service.
    Service,
    /// Looked up in the agronomy table.
    Table,
    /// Neither source had one; `text` is a placeholder.
    Missing,
}

#[derive(Debug, Clone, Serialize)]
pub struct Treatment {
    pub heading: String,
    pub text: String,
    pub source: TreatmentSource,
    /// Environmental and soil status lines shown next to a service treatment.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailedReport {
    pub crop: String,
    pub deficiency: String,
    pub severity: SeverityLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentSection>,
    pub soil: SoilSection,
    /// Table entry for the crop; `None` renders as a placeholder.
    pub crop_profile: Option<CropProfile>,
    pub treatment: Treatment,
    pub guidelines: Vec<GuidelineSection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub summary: Summary,
    /// Absent when the service could not determine a deficiency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<DetailedReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzed_by: Option<String>,
}

/// Compose the report for one prediction.
///
/// Never fails: every lookup miss becomes a placeholder string.
pub fn compose_report(
    result: &PredictionResult,
    table: &AgronomyTable,
    soil: Option<SoilType>,
) -> Report {
    let summary = Summary {
        plant: SummaryRow::new(
            "Plant Type",
            &result.plant.kind,
            result.plant.confidence,
            result.plant.message.as_ref(),
        ),
        deficiency: SummaryRow::new(
            "Deficiency",
            &result.deficiency.kind,
            result.deficiency.confidence,
            result.deficiency.message.as_ref(),
        ),
        severity: SummaryRow::new(
            "Severity",
            result.severity.level.as_str(),
            result.severity.confidence,
            result.severity.message.as_ref(),
        ),
    };

    let detail = if result.deficiency.deficiency().is_determined() {
        Some(compose_detail(result, table, soil))
    } else {
        None
    };

    Report {
        summary,
        detail,
        analyzed_at: result.timestamp.clone(),
        analyzed_by: result.analyzed_by.clone(),
    }
}

fn compose_detail(
    result: &PredictionResult,
    table: &AgronomyTable,
    soil: Option<SoilType>,
) -> DetailedReport {
    let crop = result.plant.kind.as_str();
    let environment = environment_section(result, table);
    let soil = soil_section(result, table, soil);

    let mut treatment = select_treatment(result, table);
    if treatment.source == TreatmentSource::Service {
        if let Some(env) = &environment {
            treatment.context.push(env.status.clone());
        }
        treatment.context.push(soil.status.clone());
    }

    DetailedReport {
        crop: crop.to_string(),
        deficiency: result.deficiency.kind.clone(),
        severity: result.severity.level,
        environment,
        soil,
        crop_profile: table.crop(crop).map(|(_, profile)| profile.clone()),
        treatment,
        guidelines: table.application_guidelines.clone(),
    }
}

/// Pick the treatment text: the service's own recommendation wins over the
/// table entry for (deficiency, severity).
pub fn select_treatment(result: &PredictionResult, table: &AgronomyTable) -> Treatment {
    let heading = format!(
        "{} Deficiency Treatment ({})",
        result.deficiency.kind, result.severity.level
    );

    if let Some(text) = result.service_treatment() {
        return Treatment {
            heading,
            text: text.to_string(),
            source: TreatmentSource::Service,
            context: Vec::new(),
        };
    }

    let from_table = match result.deficiency.deficiency() {
        Deficiency::Known(nutrient) => table.treatment(nutrient, result.severity.level),
        Deficiency::Unmapped(_) | Deficiency::Undetermined => None,
    };

    match from_table {
        Some(text) => Treatment {
            heading,
            text: text.to_string(),
            source: TreatmentSource::Table,
            context: Vec::new(),
        },
        None => Treatment {
            heading,
            text: NO_RECOMMENDATION.to_string(),
            source: TreatmentSource::Missing,
            context: Vec::new(),
        },
    }
}

fn environment_section(
    result: &PredictionResult,
    table: &AgronomyTable,
) -> Option<EnvironmentSection> {
    let env = result.environmental_analysis.as_ref()?;

    let status = match (non_blank(env.status.as_deref()), env.temperature, env.humidity) {
        (Some(status), _, _) => status.to_string(),
        (None, Some(t), Some(h)) => assess_climate(table, &result.plant.kind, t, h).message,
        (None, _, _) => "Environmental data not available".to_string(),
    };

    Some(EnvironmentSection {
        location: non_blank(env.location.as_deref())
            .unwrap_or("Unknown")
            .to_string(),
        temperature: env
            .temperature
            .map(|t| format!("{t:.1}°C"))
            .unwrap_or_else(|| "N/A".to_string()),
        humidity: env
            .humidity
            .map(|h| format!("{h}%"))
            .unwrap_or_else(|| "N/A".to_string()),
        status,
    })
}

fn soil_section(
    result: &PredictionResult,
    table: &AgronomyTable,
    selected: Option<SoilType>,
) -> SoilSection {
    let analysis = result.soil_analysis.as_ref();
    let echoed = analysis.and_then(|a| non_blank(a.soil_type.as_deref()));
    let service_status = analysis.and_then(|a| non_blank(a.status.as_deref()));

    let selected_name = match (selected, echoed) {
        (Some(soil), _) => soil.to_string(),
        (None, Some(name)) => name.to_string(),
        (None, None) => NOT_SPECIFIED.to_string(),
    };

    let status = match (service_status, selected) {
        (Some(status), _) => status.to_string(),
        (None, Some(soil)) => assess_soil(table, &result.plant.kind, soil).message,
        (None, None) => "Soil analysis not available".to_string(),
    };

    SoilSection {
        selected: selected_name,
        status,
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::builtin::load_builtin;

    fn prediction(json: &str) -> PredictionResult {
        serde_json::from_str(json).unwrap()
    }

    fn iron_severe() -> PredictionResult {
        prediction(
            r#"{
                "plant": {"type": "Banana", "confidence": 0.95},
                "deficiency": {"type": "iron", "confidence": 0.873},
                "severity": {"level": "Severe", "confidence": 0.66}
            }"#,
        )
    }

    #[test]
    fn test_confidence_format() {
        assert_eq!(format_confidence(0.873), "87.3%");
        assert_eq!(format_confidence(1.0), "100.0%");
        assert_eq!(format_confidence(0.0), "0.0%");
        assert_eq!(format_confidence(0.12345), "12.3%");
    }

    #[test]
    fn test_table_treatment_used_without_recommendation() {
        let table = load_builtin().unwrap();
        let t = select_treatment(&iron_severe(), &table);
        assert_eq!(t.source, TreatmentSource::Table);
        assert_eq!(t.text, "Apply chelated iron (EDDHA-Fe) for rapid correction.");
        assert_eq!(t.heading, "iron Deficiency Treatment (Severe)");
    }

    #[test]
    fn test_service_treatment_takes_precedence() {
        let table = load_builtin().unwrap();
        let mut r = iron_severe();
        r.recommendation = Some(crate::model::Recommendation {
            treatment: Some("Use the field-specific plan.".into()),
            guidelines: None,
        });
        let t = select_treatment(&r, &table);
        assert_eq!(t.source, TreatmentSource::Service);
        assert_eq!(t.text, "Use the field-specific plan.");
    }

    #[test]
    fn test_unmapped_deficiency_gets_placeholder() {
        let table = load_builtin().unwrap();
        let r = prediction(
            r#"{
                "plant": {"type": "Mango", "confidence": 0.8},
                "deficiency": {"type": "Zinc(Zn)", "confidence": 0.7},
                "severity": {"level": "Mild", "confidence": 0.6}
            }"#,
        );
        let report = compose_report(&r, &table, None);
        let detail = report.detail.unwrap();
        assert_eq!(detail.treatment.source, TreatmentSource::Missing);
        assert_eq!(detail.treatment.text, NO_RECOMMENDATION);
        assert!(detail.crop_profile.is_none());
        assert_eq!(detail.guidelines.len(), 2);
    }

    #[test]
    fn test_ungraded_severity_has_no_table_treatment() {
        let table = load_builtin().unwrap();
        let mut r = iron_severe();
        r.severity.level = SeverityLevel::Unknown;
        let t = select_treatment(&r, &table);
        assert_eq!(t.source, TreatmentSource::Missing);
    }

    #[test]
    fn test_unknown_deficiency_suppresses_detail() {
        let table = load_builtin().unwrap();
        let r = prediction(
            r#"{
                "plant": {"type": "Rice", "confidence": 0.8},
                "deficiency": {"type": "Unknown", "confidence": 1.0},
                "severity": {"level": "Not Applicable", "confidence": 1.0}
            }"#,
        );
        let report = compose_report(&r, &table, Some(SoilType::Clay));
        assert!(report.detail.is_none());
        assert_eq!(report.summary.deficiency.value, "Unknown");
    }

    #[test]
    fn test_summary_rows() {
        let table = load_builtin().unwrap();
        let report = compose_report(&iron_severe(), &table, None);
        assert_eq!(report.summary.deficiency.confidence_display, "87.3%");
        assert_eq!(report.summary.plant.label, "Plant Type");
        assert_eq!(report.summary.severity.value, "Severe");
    }

    #[test]
    fn test_soil_falls_back_to_local_assessment() {
        let table = load_builtin().unwrap();
        let report = compose_report(&iron_severe(), &table, Some(SoilType::Sandy));
        let soil = report.detail.unwrap().soil;
        assert_eq!(soil.selected, "Sandy");
        assert_eq!(soil.status, "Not Ideal: Banana prefers Loamy, Clay soil");
    }

    #[test]
    fn test_soil_without_selection() {
        let table = load_builtin().unwrap();
        let report = compose_report(&iron_severe(), &table, None);
        let soil = report.detail.unwrap().soil;
        assert_eq!(soil.selected, NOT_SPECIFIED);
        assert_eq!(soil.status, "Soil analysis not available");
    }

    #[test]
    fn test_environment_defaults_and_climate_fallback() {
        let table = load_builtin().unwrap();
        let r = prediction(
            r#"{
                "plant": {"type": "Rice", "confidence": 0.9},
                "deficiency": {"type": "Nitrogen(N)", "confidence": 0.9},
                "severity": {"level": "Mild", "confidence": 0.9},
                "environmental_analysis": {"temperature": 27.26, "humidity": 85.0}
            }"#,
        );
        let report = compose_report(&r, &table, None);
        let env = report.detail.unwrap().environment.unwrap();
        assert_eq!(env.location, "Unknown");
        assert_eq!(env.temperature, "27.3°C");
        assert_eq!(env.humidity, "85%");
        assert!(env.status.starts_with("Optimal"));
    }

    #[test]
    fn test_environment_missing_readings() {
        let table = load_builtin().unwrap();
        let r = prediction(
            r#"{
                "plant": {"type": "Rice", "confidence": 0.9},
                "deficiency": {"type": "Nitrogen(N)", "confidence": 0.9},
                "severity": {"level": "Mild", "confidence": 0.9},
                "environmental_analysis": {"location": "Kandy", "temperature": null}
            }"#,
        );
        let report = compose_report(&r, &table, None);
        let env = report.detail.unwrap().environment.unwrap();
        assert_eq!(env.temperature, "N/A");
        assert_eq!(env.status, "Environmental data not available");
    }

    #[test]
    fn test_service_treatment_carries_context() {
        let table = load_builtin().unwrap();
        let r = prediction(
            r#"{
                "plant": {"type": "Rice", "confidence": 0.9},
                "deficiency": {"type": "Nitrogen(N)", "confidence": 0.9},
                "severity": {"level": "Mild", "confidence": 0.9},
                "environmental_analysis": {"location": "Kandy", "status": "weather ok"},
                "soil_analysis": {"soil_type": "Clay", "status": "soil ok"},
                "recommendation": {"treatment": "server says"}
            }"#,
        );
        let report = compose_report(&r, &table, None);
        let detail = report.detail.unwrap();
        assert_eq!(detail.treatment.context, vec!["weather ok", "soil ok"]);
        assert_eq!(detail.soil.selected, "Clay");
    }
}
