pub mod json;
pub mod table;

use nutrisense_core::error::NutriError;
use std::path::Path;

/// Print to stdout, or write to `path` and say so on stderr.
pub fn emit(content: &str, path: Option<&Path>) -> Result<(), NutriError> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            eprintln!("Report written to {}", p.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}
