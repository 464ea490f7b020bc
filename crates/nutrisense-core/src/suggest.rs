//! Crop suggestions for a location.

use crate::client::PredictionBackend;
use crate::error::NutriError;
use crate::model::{CropConditions, LocationPlants, SuggestedPlant};
use crate::parsing::normalize::sentence_case;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize)]
pub struct CropSuggestions {
    pub location: String,
    pub plants: Vec<SuggestedPlant>,
    pub conditions: CropConditions,
}

/// Locations the service knows, in sentence case for display.
pub async fn available_locations<B: PredictionBackend>(
    backend: &B,
) -> Result<Vec<String>, NutriError> {
    let locations = backend.locations().await?;
    debug!("{} locations from {}", locations.len(), backend.backend_name());
    Ok(locations.iter().map(|l| sentence_case(l)).collect())
}

/// Crops predicted for `location`, restricted to those actually grown there.
pub async fn suggest_crops<B: PredictionBackend>(
    backend: &B,
    location: &str,
) -> Result<CropSuggestions, NutriError> {
    let location = location.trim();
    if location.is_empty() {
        return Err(NutriError::InputMissing);
    }

    let (prediction, grown) =
        tokio::try_join!(backend.predict_crops(location), backend.location_plants())?;
    let plants = filter_by_location(prediction.plants, &grown, location);
    info!("{} crop suggestions for {location}", plants.len());

    Ok(CropSuggestions {
        location: sentence_case(location),
        plants,
        conditions: prediction.metadata,
    })
}

/// Keep the plants listed under `location`. Matching is case-insensitive on
/// both the location and the plant name; an unlisted location keeps nothing.
pub fn filter_by_location(
    plants: Vec<SuggestedPlant>,
    grown: &LocationPlants,
    location: &str,
) -> Vec<SuggestedPlant> {
    let wanted = location.trim().to_lowercase();
    let Some(names) = grown
        .iter()
        .find(|(loc, _)| loc.trim().to_lowercase() == wanted)
        .map(|(_, names)| names)
    else {
        return Vec::new();
    };

    let names: Vec<String> = names.iter().map(|n| n.trim().to_lowercase()).collect();
    plants
        .into_iter()
        .filter(|p| names.contains(&p.name.trim().to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plant(name: &str) -> SuggestedPlant {
        SuggestedPlant {
            name: name.into(),
            image: None,
        }
    }

    fn grown() -> LocationPlants {
        let mut m = LocationPlants::new();
        m.insert("kandy".into(), vec!["tea".into(), "banana".into()]);
        m.insert("anuradhapura".into(), vec!["rice".into()]);
        m
    }

    #[test]
    fn test_filter_keeps_listed_plants() {
        let kept = filter_by_location(
            vec![plant("Banana"), plant("Rice"), plant("Tea")],
            &grown(),
            "KANDY",
        );
        let names: Vec<&str> = kept.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Banana", "Tea"]);
    }

    #[test]
    fn test_unknown_location_is_empty() {
        let kept = filter_by_location(vec![plant("Rice")], &grown(), "Galle");
        assert!(kept.is_empty());
    }
}
