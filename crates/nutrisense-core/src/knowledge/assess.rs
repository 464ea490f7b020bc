//! Local suitability checks of observed conditions against a crop profile.
//!
//! The prediction service normally sends these as status strings. When it
//! does not, the report falls back to the same checks computed here.

use crate::knowledge::schema::AgronomyTable;
use crate::model::SoilType;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Suitability {
    Suitable,
    NotIdeal,
    NoData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub suitability: Suitability,
    pub message: String,
}

impl Assessment {
    fn no_data(message: &str) -> Self {
        Assessment {
            suitability: Suitability::NoData,
            message: message.to_string(),
        }
    }
}

/// Is `soil` among the soils the crop grows well in?
pub fn assess_soil(table: &AgronomyTable, crop: &str, soil: SoilType) -> Assessment {
    let Some((name, profile)) = table.crop(crop) else {
        return Assessment::no_data("Soil preference data not available for this plant type");
    };

    if profile.soil.suitable_soils.contains(&soil) {
        Assessment {
            suitability: Suitability::Suitable,
            message: format!("Suitable: {soil} soil is ideal for {name}"),
        }
    } else {
        let preferred: Vec<String> = profile
            .soil
            .suitable_soils
            .iter()
            .map(|s| s.to_string())
            .collect();
        Assessment {
            suitability: Suitability::NotIdeal,
            message: format!("Not Ideal: {name} prefers {} soil", preferred.join(", ")),
        }
    }
}

/// Are temperature (°C) and relative humidity (%) inside the crop's ranges?
/// Both bounds are inclusive.
pub fn assess_climate(
    table: &AgronomyTable,
    crop: &str,
    temperature: f64,
    humidity: f64,
) -> Assessment {
    let Some((_, profile)) = table.crop(crop) else {
        return Assessment::no_data(
            "Environmental conditions data not available for this plant type",
        );
    };

    let [t_min, t_max] = profile.conditions.temp_range;
    let [h_min, h_max] = profile.conditions.humidity_range;
    let temp_ok = (t_min..=t_max).contains(&temperature);
    let humidity_ok = (h_min..=h_max).contains(&humidity);

    if temp_ok && humidity_ok {
        Assessment {
            suitability: Suitability::Suitable,
            message: format!(
                "Optimal: Temperature ({temperature}°C) and Humidity ({humidity}%) are within ideal ranges"
            ),
        }
    } else {
        Assessment {
            suitability: Suitability::NotIdeal,
            message: format!(
                "Suboptimal: Ideal ranges are {t_min}-{t_max}°C and {h_min}-{h_max}% humidity"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::builtin::load_builtin;

    #[test]
    fn test_suitable_soil() {
        let table = load_builtin().unwrap();
        let a = assess_soil(&table, "Rice", SoilType::Clay);
        assert_eq!(a.suitability, Suitability::Suitable);
        assert_eq!(a.message, "Suitable: Clay soil is ideal for Rice");
    }

    #[test]
    fn test_unsuitable_soil_lists_preferences() {
        let table = load_builtin().unwrap();
        let a = assess_soil(&table, "coffee", SoilType::Clay);
        assert_eq!(a.suitability, Suitability::NotIdeal);
        assert_eq!(a.message, "Not Ideal: Coffee prefers Loamy, Sandy soil");
    }

    #[test]
    fn test_soil_for_unknown_crop() {
        let table = load_builtin().unwrap();
        let a = assess_soil(&table, "Mango", SoilType::Loamy);
        assert_eq!(a.suitability, Suitability::NoData);
    }

    #[test]
    fn test_climate_within_ranges() {
        let table = load_builtin().unwrap();
        let a = assess_climate(&table, "Banana", 24.5, 65.0);
        assert_eq!(a.suitability, Suitability::Suitable);
        assert!(a.message.contains("24.5°C"));
    }

    #[test]
    fn test_climate_bounds_inclusive() {
        let table = load_builtin().unwrap();
        let a = assess_climate(&table, "Rice", 35.0, 100.0);
        assert_eq!(a.suitability, Suitability::Suitable);
    }

    #[test]
    fn test_climate_outside_ranges() {
        let table = load_builtin().unwrap();
        let a = assess_climate(&table, "Coffee", 31.0, 70.0);
        assert_eq!(a.suitability, Suitability::NotIdeal);
        assert_eq!(
            a.message,
            "Suboptimal: Ideal ranges are 15-28°C and 60-90% humidity"
        );
    }
}
