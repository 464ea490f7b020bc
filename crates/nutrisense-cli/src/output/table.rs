use nutrisense_core::knowledge::schema::CropProfile;
use nutrisense_core::suggest::CropSuggestions;

pub fn print_suggestions(suggestions: &CropSuggestions) {
    println!("=== Suitable crops for {} ===\n", suggestions.location);

    if suggestions.plants.is_empty() {
        println!("  No crops from the prediction are grown at this location.");
    } else {
        for plant in &suggestions.plants {
            match plant.image {
                Some(ref image) => println!("  {:<16} {}", plant.name, image),
                None => println!("  {}", plant.name),
            }
        }
    }
    println!();

    let c = &suggestions.conditions;
    let fields = [
        ("Temperature", c.temperature, "°C"),
        ("Humidity", c.humidity, "%"),
        ("Rainfall", c.rainfall, " mm"),
        ("Soil pH", c.ph, ""),
    ];
    if fields.iter().any(|(_, v, _)| v.is_some()) {
        println!("Conditions:");
        for (label, value, unit) in fields {
            match value {
                Some(v) => println!("  {:<12} {:.1}{}", label, v, unit),
                None => println!("  {:<12} N/A", label),
            }
        }
    }
}

pub fn print_crop(name: &str, profile: &CropProfile) {
    println!("=== {name} ===\n");

    let soils: Vec<String> = profile
        .soil
        .suitable_soils
        .iter()
        .map(|s| s.to_string())
        .collect();
    let [ph_min, ph_max] = profile.soil.ph_range;
    let [t_min, t_max] = profile.conditions.temp_range;
    let [h_min, h_max] = profile.conditions.humidity_range;

    println!("Soil Preferences:");
    println!("  pH Range:        {ph_min} - {ph_max}");
    println!("  Suitable Soils:  {}", soils.join(", "));
    println!();
    println!("Optimal Conditions:");
    println!("  Temperature:     {t_min}°C - {t_max}°C");
    println!("  Humidity:        {h_min}% - {h_max}%");
    println!();
    println!("Nutrient Requirements (kg/ha):");
    println!("  Nitrogen (N):    {}", profile.nutrients.nitrogen);
    println!("  Phosphorus (P):  {}", profile.nutrients.phosphorus);
    println!("  Potassium (K):   {}", profile.nutrients.potassium);

    if !profile.common_deficiencies.is_empty() {
        let common: Vec<String> = profile
            .common_deficiencies
            .iter()
            .map(|n| format!("{} ({})", n, n.symbol()))
            .collect();
        println!();
        println!("Common Deficiencies:");
        println!("  {}", common.join(", "));
    }
}
