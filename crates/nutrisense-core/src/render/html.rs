use crate::report::{DetailedReport, Report, SummaryRow, NO_DATA};
use std::fmt::Write;

/// Escape text for use in HTML element content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Standalone HTML page for a report. Every service-provided string is
/// escaped before it is written.
pub fn render(report: &Report) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>NutriSense Report</title>\n<style>\n");
    out.push_str(STYLE);
    out.push_str("</style>\n</head>\n<body>\n");

    out.push_str("<section class=\"results\">\n<h2>Results</h2>\n");
    for row in report.summary.rows() {
        render_row(&mut out, row);
    }
    out.push_str("</section>\n");

    if let Some(ref detail) = report.detail {
        render_detail(&mut out, report, detail);
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn render_row(out: &mut String, row: &SummaryRow) {
    let width = (row.confidence * 100.0).clamp(0.0, 100.0);
    let _ = writeln!(
        out,
        "<div class=\"result-item\">\n  <h3>{}</h3>\n  <p class=\"value\">{}</p>\n  \
         <div class=\"confidence-bar\"><div class=\"confidence-level\" style=\"width: {:.1}%\"></div></div>\n  \
         <p class=\"confidence\">{} confidence</p>",
        escape_html(&row.label),
        escape_html(&row.value),
        width,
        escape_html(&row.confidence_display),
    );
    if let Some(ref message) = row.message {
        let _ = writeln!(out, "  <p class=\"message\">{}</p>", escape_html(message));
    }
    out.push_str("</div>\n");
}

fn render_detail(out: &mut String, report: &Report, detail: &DetailedReport) {
    out.push_str("<section class=\"report-card\">\n<h2>Detailed Plant Report</h2>\n");

    if report.analyzed_at.is_some() || report.analyzed_by.is_some() {
        out.push_str("<div class=\"report-meta\">\n");
        if let Some(ref at) = report.analyzed_at {
            let _ = writeln!(out, "  <p>Analysis Date: {}</p>", escape_html(at));
        }
        if let Some(ref by) = report.analyzed_by {
            let _ = writeln!(out, "  <p>Analyzed by: {}</p>", escape_html(by));
        }
        out.push_str("</div>\n");
    }

    if let Some(ref env) = detail.environment {
        out.push_str("<div class=\"report-section\">\n<h3>Environmental Analysis</h3>\n");
        let _ = writeln!(out, "  <p><strong>Location:</strong> {}</p>", escape_html(&env.location));
        let _ = writeln!(
            out,
            "  <p><strong>Temperature:</strong> {}</p>",
            escape_html(&env.temperature)
        );
        let _ = writeln!(out, "  <p><strong>Humidity:</strong> {}</p>", escape_html(&env.humidity));
        let _ = writeln!(out, "  <p class=\"status\">{}</p>", escape_html(&env.status));
        out.push_str("</div>\n");
    }

    out.push_str("<div class=\"report-section\">\n<h3>Soil &amp; Growing Conditions</h3>\n");
    let _ = writeln!(
        out,
        "  <p><strong>Selected Soil:</strong> {}</p>\n  <p class=\"status\">{}</p>",
        escape_html(&detail.soil.selected),
        escape_html(&detail.soil.status)
    );
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
            let _ = writeln!(out, "  <p><strong>pH Range:</strong> {ph_min} - {ph_max}</p>");
            let _ = writeln!(
                out,
                "  <p><strong>Suitable Soils:</strong> {}</p>",
                escape_html(&soils.join(", "))
            );
            let _ = writeln!(
                out,
                "  <p><strong>Temperature:</strong> {t_min}°C - {t_max}°C</p>"
            );
            let _ = writeln!(out, "  <p><strong>Humidity:</strong> {h_min}% - {h_max}%</p>");
            out.push_str("</div>\n");

            out.push_str("<div class=\"report-section\">\n<h3>Nutrient Requirements (kg/ha)</h3>\n");
            out.push_str("<ul class=\"nutrients\">\n");
            let _ = writeln!(out, "  <li>Nitrogen (N): {}</li>", profile.nutrients.nitrogen);
            let _ = writeln!(out, "  <li>Phosphorus (P): {}</li>", profile.nutrients.phosphorus);
            let _ = writeln!(out, "  <li>Potassium (K): {}</li>", profile.nutrients.potassium);
            out.push_str("</ul>\n</div>\n");
        }
        None => {
            let _ = writeln!(
                out,
                "  <p class=\"placeholder\">{} for {}</p>\n</div>",
                NO_DATA,
                escape_html(&detail.crop)
            );
            out.push_str("<div class=\"report-section\">\n<h3>Nutrient Requirements (kg/ha)</h3>\n");
            let _ = writeln!(out, "  <p class=\"placeholder\">{NO_DATA}</p>\n</div>");
        }
    }

    out.push_str("<div class=\"report-section\">\n<h3>Treatment Recommendations</h3>\n");
    let _ = writeln!(
        out,
        "  <h4>{}</h4>\n  <p>{}</p>",
        escape_html(&detail.treatment.heading),
        escape_html(&detail.treatment.text)
    );
    if !detail.treatment.context.is_empty() {
        out.push_str("  <h4>Environmental Context</h4>\n  <ul>\n");
        for line in &detail.treatment.context {
            let _ = writeln!(out, "    <li>{}</li>", escape_html(line));
        }
        out.push_str("  </ul>\n");
    }
    out.push_str("</div>\n");

    if !detail.guidelines.is_empty() {
        out.push_str("<div class=\"report-section\">\n<h3>Application Guidelines</h3>\n");
        for section in &detail.guidelines {
            let _ = writeln!(out, "  <h4>{}</h4>\n  <ul>", escape_html(&section.title));
            for item in &section.items {
                let _ = writeln!(out, "    <li>{}</li>", escape_html(item));
            }
            out.push_str("  </ul>\n");
        }
        out.push_str("</div>\n");
    }

    out.push_str("</section>\n");
}

const STYLE: &str = "\
body { font-family: sans-serif; max-width: 860px; margin: 2rem auto; color: #1b3a1b; }
.result-item { border: 1px solid #cfe3cf; border-radius: 6px; padding: 0.75rem; margin-bottom: 0.75rem; }
.confidence-bar { background: #e6efe6; height: 8px; border-radius: 4px; }
.confidence-level { background: #2e7d32; height: 8px; border-radius: 4px; }
.report-card { border-top: 2px solid #2e7d32; margin-top: 1.5rem; }
.report-section { margin: 1rem 0; }
.status { font-style: italic; }
.placeholder { color: #777; }
";

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
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_service_strings_are_escaped() {
        let html = render(&report_for(
            r#"{
                "plant": {"type": "<script>alert(1)</script>", "confidence": 0.5},
                "deficiency": {"type": "Potassium", "confidence": 0.5},
                "severity": {"level": "Mild", "confidence": 0.5},
                "recommendation": {"treatment": "K & Mg <now>"}
            }"#,
        ));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("K &amp; Mg &lt;now&gt;"));
    }

    #[test]
    fn test_confidence_bar_width() {
        let html = render(&report_for(
            r#"{
                "plant": {"type": "Banana", "confidence": 0.873},
                "deficiency": {"type": "Magnesium(Mg)", "confidence": 0.4},
                "severity": {"level": "Severe", "confidence": 0.9}
            }"#,
        ));
        assert!(html.contains("style=\"width: 87.3%\""));
        assert!(html.contains("87.3% confidence"));
        assert!(html.contains("Apply 100 kg/ha of MgSO4 with irrigation water."));
        assert!(html.contains("<li>Potassium (K): 350</li>"));
    }

    #[test]
    fn test_missing_crop_profile_placeholder() {
        let html = render(&report_for(
            r#"{
                "plant": {"type": "Tea", "confidence": 0.7},
                "deficiency": {"type": "Nitrogen", "confidence": 0.7},
                "severity": {"level": "Moderate", "confidence": 0.7}
            }"#,
        ));
        assert!(html.contains("No data available for Tea"));
        assert!(html.contains("Apply 50 kg/ha of urea in split doses."));
        assert!(html.contains("Best Practices"));
    }
}
