use nutrisense_core::error::NutriError;
use nutrisense_core::knowledge::schema::AgronomyTable;
use nutrisense_core::knowledge::{builtin, load_table, table_warnings};
use nutrisense_core::model::{Deficiency, SeverityLevel};
use nutrisense_core::parsing::normalize::derive_lookup_key;
use nutrisense_core::report::{NO_DATA, NO_RECOMMENDATION};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::output;

/// The table given with `--knowledge`, or the builtin one.
pub fn load(path: Option<&Path>) -> Result<Arc<AgronomyTable>, NutriError> {
    let table = match path {
        Some(p) => Arc::new(load_table(p)?),
        None => builtin::shared()?,
    };
    debug!("agronomy table '{}' v{} with {} crops", table.name, table.version, table.crops.len());
    Ok(table)
}

pub fn list(path: Option<&Path>) -> Result<(), NutriError> {
    let table = load(path)?;

    println!("{} (v{})", table.name, table.version);
    if let Some(ref desc) = table.description {
        println!("{desc}");
    }
    println!();

    println!("Crops:\n");
    for (name, profile) in &table.crops {
        let common: Vec<String> = profile
            .common_deficiencies
            .iter()
            .map(|n| n.to_string())
            .collect();
        println!("  {:<10} common deficiencies: {}", name, common.join(", "));
    }
    println!();

    let levels: Vec<&str> = table.severity_levels.iter().map(|l| l.as_str()).collect();
    println!("Treatments ({}):\n", levels.join(" / "));
    for (nutrient, by_level) in &table.fertilizer_recommendations {
        println!(
            "  {:<10} ({}) {} level(s)",
            nutrient.to_string(),
            nutrient.symbol(),
            by_level.len()
        );
    }
    Ok(())
}

pub fn show(path: Option<&Path>, crop: &str) -> Result<(), NutriError> {
    let table = load(path)?;
    match table.crop(crop) {
        Some((name, profile)) => output::table::print_crop(name, profile),
        None => {
            let known: Vec<&str> = table.crops.keys().map(String::as_str).collect();
            println!("{NO_DATA} for {crop}. Known crops: {}", known.join(", "));
        }
    }
    Ok(())
}

pub fn treatment(path: Option<&Path>, label: &str, severity: &str) -> Result<(), NutriError> {
    let table = load(path)?;
    let level = SeverityLevel::from_label(severity);

    let text = match Deficiency::from_label(label) {
        Deficiency::Known(nutrient) => {
            println!("{} -> {} ({}), {}", label, nutrient, nutrient.symbol(), level);
            table.treatment(nutrient, level).unwrap_or(NO_RECOMMENDATION)
        }
        Deficiency::Unmapped(key) => {
            println!("{label} -> {key} (no table entry), {level}");
            NO_RECOMMENDATION
        }
        Deficiency::Undetermined => {
            println!("{label} -> no deficiency determined");
            return Ok(());
        }
    };
    println!("\n  {text}");

    if !level.is_graded() {
        let key = derive_lookup_key(label);
        eprintln!(
            "  note: severity '{severity}' is not one of Mild, Moderate, Severe; no treatment for {key} applies"
        );
    }
    Ok(())
}

pub fn export() -> Result<(), NutriError> {
    print!("{}", builtin::builtin_json());
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), NutriError> {
    let table = load_table(file)?;

    println!("Agronomy table '{}' (v{}) is valid.", table.name, table.version);
    println!("  Crops: {}", table.crops.len());
    println!("  Nutrients with treatments: {}", table.fertilizer_recommendations.len());

    let warnings = table_warnings(&table);
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {w}");
        }
    }
    Ok(())
}
