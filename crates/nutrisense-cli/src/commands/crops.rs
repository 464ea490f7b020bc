use nutrisense_core::client::http::HttpBackend;
use nutrisense_core::config::ClientConfig;
use nutrisense_core::error::NutriError;
use nutrisense_core::suggest::{available_locations, suggest_crops};

use crate::output;

pub async fn run(config: ClientConfig, location: &str, output_format: &str) -> Result<(), NutriError> {
    let backend = HttpBackend::new(config)?;
    let suggestions = suggest_crops(&backend, location).await?;

    match output_format {
        "json" => output::json::print(&suggestions)?,
        _ => output::table::print_suggestions(&suggestions),
    }
    Ok(())
}

pub async fn locations(config: ClientConfig, output_format: &str) -> Result<(), NutriError> {
    let backend = HttpBackend::new(config)?;
    let locations = available_locations(&backend).await?;

    match output_format {
        "json" => output::json::print(&locations)?,
        _ => {
            println!("Available locations:\n");
            for location in &locations {
                println!("  {location}");
            }
        }
    }
    Ok(())
}
