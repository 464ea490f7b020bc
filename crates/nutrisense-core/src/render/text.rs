use crate::report::{DetailedReport, Report, NO_DATA};
use std::fmt::Write;

/// Plain-text rendering of a report, for terminals.
pub fn render(report: &Report) -> String {
    let mut out = String::new();

    out.push_str("=== Results ===\n\n");
    let width = report
        .summary
        .rows()
        .iter()
        .map(|r| r.label.len())
        .max()
        .unwrap_or(10);
    for row in report.summary.rows() {
        let _ = writeln!(
            out,
            "  {:<width$}  {}  ({} confidence)",
            row.label,
            row.value,
            row.confidence_display,
            width = width
        );
        if let Some(ref message) = row.message {
            let _ = writeln!(out, "  {:<width$}  {}", "", message, width = width);
        }
    }
    out.push('\n');

    if let Some(ref detail) = report.detail {
        render_detail(&mut out, report, detail);
    }

    out
}

fn render_detail(out: &mut String, report: &Report, detail: &DetailedReport) {
    out.push_str("=== Detailed Plant Report ===\n\n");

    if let Some(ref at) = report.analyzed_at {
        let _ = writeln!(out, "  Analysis Date: {at}");
    }
    if let Some(ref by) = report.analyzed_by {
        let _ = writeln!(out, "  Analyzed by:   {by}");
    }
    if report.analyzed_at.is_some() || report.analyzed_by.is_some() {
        out.push('\n');
    }

    if let Some(ref env) = detail.environment {
        out.push_str("Environmental Analysis\n");
        let _ = writeln!(out, "  Location:     {}", env.location);
        let _ = writeln!(out, "  Temperature:  {}", env.temperature);
        let _ = writeln!(out, "  Humidity:     {}", env.humidity);
        let _ = writeln!(out, "  {}", env.status);
        out.push('\n');
    }

    out.push_str("Soil Analysis\n");
    let _ = writeln!(out, "  Selected Soil: {}", detail.soil.selected);
    let _ = writeln!(out, "  {}", detail.soil.status);
    out.push('\n');

    out.push_str("Soil & Growing Conditions\n");
    match detail.crop_profile {
        Some(ref profile) => {
            let [ph_min, ph_max] = profile.soil.ph_range;
            let soils: Vec<String> = profile
                .soil
                .suitable_soils
                .iter()
                .map(|s| s.to_string())
                .collect();
            let [t_min, t_max] = profile.conditions.temp_range;
            let [h_min, h_max] = profile.conditions.humidity_range;
            let _ = writeln!(out, "  pH Range:       {ph_min} - {ph_max}");
            let _ = writeln!(out, "  Suitable Soils: {}", soils.join(", "));
            let _ = writeln!(out, "  Temperature:    {t_min}°C - {t_max}°C");
            let _ = writeln!(out, "  Humidity:       {h_min}% - {h_max}%");
            out.push('\n');

            out.push_str("Nutrient Requirements (kg/ha)\n");
            let _ = writeln!(out, "  Nitrogen (N):   {}", profile.nutrients.nitrogen);
            let _ = writeln!(out, "  Phosphorus (P): {}", profile.nutrients.phosphorus);
            let _ = writeln!(out, "  Potassium (K):  {}", profile.nutrients.potassium);
        }
        None => {
            let _ = writeln!(out, "  {} for {}", NO_DATA, detail.crop);
            out.push('\n');
            out.push_str("Nutrient Requirements (kg/ha)\n");
            let _ = writeln!(out, "  {NO_DATA}");
        }
    }
    out.push('\n');

    out.push_str("Treatment Recommendations\n");
    let _ = writeln!(out, "  {}", detail.treatment.heading);
    let _ = writeln!(out, "    {}", detail.treatment.text);
    if !detail.treatment.context.is_empty() {
        out.push_str("    Environmental Context:\n");
        for line in &detail.treatment.context {
            let _ = writeln!(out, "      - {line}");
        }
    }
    out.push('\n');

    if !detail.guidelines.is_empty() {
        out.push_str("Application Guidelines\n");
        for section in &detail.guidelines {
            let _ = writeln!(out, "  {}:", section.title);
            for item in &section.items {
                let _ = writeln!(out, "    - {item}");
            }
        }
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::builtin::load_builtin;
    use crate::model::PredictionResult;
    use crate::report::compose_report;

    fn report_for(json: &str) -> Report {
        let table = load_builtin().unwrap();
        let r: PredictionResult = serde_json::from_str(json).unwrap();
        compose_report(&r, &table, None)
    }

    #[test]
    fn test_summary_lines() {
        let text = render(&report_for(
            r#"{
                "plant": {"type": "Rice", "confidence": 0.873},
                "deficiency": {"type": "Nitrogen(N)", "confidence": 0.5},
                "severity": {"level": "Mild", "confidence": 0.25}
            }"#,
        ));
        assert!(text.contains("Plant Type  Rice  (87.3% confidence)"));
        assert!(text.contains("Apply 20-30 kg/ha of urea as a foliar spray."));
        assert!(text.contains("Nitrogen (N):   100"));
    }

    #[test]
    fn test_unknown_crop_renders_placeholder_and_rest() {
        let text = render(&report_for(
            r#"{
                "plant": {"type": "Mango", "confidence": 0.9},
                "deficiency": {"type": "Iron", "confidence": 0.9},
                "severity": {"level": "Moderate", "confidence": 0.9}
            }"#,
        ));
        assert!(text.contains("No data available for Mango"));
        assert!(text.contains("Apply 10 g/ha of FeSO4 to the soil and monitor symptoms."));
        assert!(text.contains("Application Guidelines"));
    }

    #[test]
    fn test_no_detail_for_undetermined_deficiency() {
        let text = render(&report_for(
            r#"{
                "plant": {"type": "Coffee", "confidence": 0.9},
                "deficiency": {"type": "Healthy/Unknown", "confidence": 0.6},
                "severity": {"level": "Not Applicable", "confidence": 1.0}
            }"#,
        ));
        assert!(text.contains("Healthy/Unknown"));
        assert!(!text.contains("Detailed Plant Report"));
    }
}
