pub mod assess;
pub mod builtin;
pub mod schema;

use crate::error::NutriError;
use schema::AgronomyTable;
use std::path::Path;

/// Load an agronomy table from a JSON file.
pub fn load_table(path: &Path) -> Result<AgronomyTable, NutriError> {
    let content = std::fs::read_to_string(path).map_err(|e| NutriError::TableLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_table(&content, path)
}

/// Parse an agronomy table from a JSON string.
pub fn parse_table(json: &str, source: &Path) -> Result<AgronomyTable, NutriError> {
    let table: AgronomyTable = serde_json::from_str(json).map_err(|e| NutriError::TableLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_table(&table)?;
    Ok(table)
}

/// Parse an agronomy table from a JSON string (no file path context).
pub fn parse_table_str(json: &str) -> Result<AgronomyTable, NutriError> {
    let table: AgronomyTable = serde_json::from_str(json)?;
    validate_table(&table)?;
    Ok(table)
}

/// Validate that a table is well-formed.
pub fn validate_table(table: &AgronomyTable) -> Result<(), NutriError> {
    if table.crops.is_empty() {
        return Err(NutriError::TableInvalid("crops must not be empty".into()));
    }

    if table.severity_levels.is_empty() {
        return Err(NutriError::TableInvalid(
            "severity_levels must not be empty".into(),
        ));
    }

    if let Some(level) = table.severity_levels.iter().find(|l| !l.is_graded()) {
        return Err(NutriError::TableInvalid(format!(
            "severity level '{}' is not a graded level (expected Mild, Moderate or Severe)",
            level
        )));
    }

    for (name, crop) in &table.crops {
        if name.trim().is_empty() {
            return Err(NutriError::TableInvalid("crop name must not be empty".into()));
        }

        let [ph_min, ph_max] = crop.soil.ph_range;
        if !(0.0..=14.0).contains(&ph_min) || !(0.0..=14.0).contains(&ph_max) || ph_min > ph_max {
            return Err(NutriError::TableInvalid(format!(
                "crop '{}' has invalid pH range {}-{}",
                name, ph_min, ph_max
            )));
        }

        let [t_min, t_max] = crop.conditions.temp_range;
        if t_min > t_max {
            return Err(NutriError::TableInvalid(format!(
                "crop '{}' has inverted temperature range {}-{}",
                name, t_min, t_max
            )));
        }

        let [h_min, h_max] = crop.conditions.humidity_range;
        if !(0.0..=100.0).contains(&h_min) || !(0.0..=100.0).contains(&h_max) || h_min > h_max {
            return Err(NutriError::TableInvalid(format!(
                "crop '{}' has invalid humidity range {}-{}",
                name, h_min, h_max
            )));
        }

        if crop.soil.suitable_soils.is_empty() {
            return Err(NutriError::TableInvalid(format!(
                "crop '{}' lists no suitable soils",
                name
            )));
        }
    }

    for (nutrient, by_level) in &table.fertilizer_recommendations {
        if by_level.is_empty() {
            return Err(NutriError::TableInvalid(format!(
                "nutrient '{}' has no treatments",
                nutrient
            )));
        }

        for (level, text) in by_level {
            if !table.severity_levels.contains(level) {
                return Err(NutriError::TableInvalid(format!(
                    "nutrient '{}' references unknown severity level '{}'",
                    nutrient, level
                )));
            }
            if text.trim().is_empty() {
                return Err(NutriError::TableInvalid(format!(
                    "nutrient '{}' has an empty {} treatment",
                    nutrient, level
                )));
            }
        }
    }

    Ok(())
}

/// Non-fatal gaps in a table: missing treatment levels and deficiencies
/// listed for a crop that have no treatment at all.
pub fn table_warnings(table: &AgronomyTable) -> Vec<String> {
    let mut warnings = Vec::new();

    for (nutrient, by_level) in &table.fertilizer_recommendations {
        for level in &table.severity_levels {
            if !by_level.contains_key(level) {
                warnings.push(format!(
                    "nutrient '{}' has no treatment for severity '{}'",
                    nutrient, level
                ));
            }
        }
    }

    for (name, crop) in &table.crops {
        for nutrient in &crop.common_deficiencies {
            if !table.fertilizer_recommendations.contains_key(nutrient) {
                warnings.push(format!(
                    "crop '{}' lists {} deficiency but the table has no treatment for it",
                    name, nutrient
                ));
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "name": "Test",
        "version": "1.0",
        "severity_levels": ["Mild", "Severe"],
        "crops": {
            "Rice": {
                "soil": { "ph_range": [5.5, 7.5], "suitable_soils": ["Clay"] },
                "conditions": { "temp_range": [20, 35], "humidity_range": [70, 100] },
                "nutrients": { "N": 100, "P": 40, "K": 150 },
                "common_deficiencies": ["Nitrogen", "Zinc"]
            }
        },
        "fertilizer_recommendations": {
            "Nitrogen": { "Mild": "urea" }
        }
    }"#;

    #[test]
    fn test_unknown_nutrient_rejected() {
        // "Zinc" is not a Nutrient variant
        assert!(parse_table_str(MINIMAL).is_err());
    }

    #[test]
    fn test_parse_valid_table() {
        let json = MINIMAL.replace(", \"Zinc\"", "");
        let table = parse_table_str(&json).unwrap();
        assert_eq!(table.name, "Test");
        assert!(table.crop("rice").is_some());
    }

    #[test]
    fn test_warnings_for_missing_levels() {
        let json = MINIMAL.replace(", \"Zinc\"", "");
        let table = parse_table_str(&json).unwrap();
        let warnings = table_warnings(&table);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Severe"));
    }

    #[test]
    fn test_inverted_ph_range_rejected() {
        let json = MINIMAL
            .replace(", \"Zinc\"", "")
            .replace("[5.5, 7.5]", "[7.5, 5.5]");
        assert!(parse_table_str(&json).is_err());
    }

    #[test]
    fn test_ungraded_severity_level_rejected() {
        let json = MINIMAL
            .replace(", \"Zinc\"", "")
            .replace("[\"Mild\", \"Severe\"]", "[\"Mild\", \"Not Applicable\"]");
        assert!(parse_table_str(&json).is_err());
    }

    #[test]
    fn test_treatment_for_undeclared_level_rejected() {
        let json = MINIMAL
            .replace(", \"Zinc\"", "")
            .replace("\"Mild\": \"urea\"", "\"Moderate\": \"urea\"");
        assert!(parse_table_str(&json).is_err());
    }

    #[test]
    fn test_empty_crops_rejected() {
        let json = r#"{
            "name": "Bad",
            "version": "1.0",
            "severity_levels": ["Mild"],
            "crops": {},
            "fertilizer_recommendations": {}
        }"#;
        assert!(parse_table_str(json).is_err());
    }
}
