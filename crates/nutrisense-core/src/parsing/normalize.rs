use crate::model::Nutrient;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Derive the table lookup key from a deficiency label sent by the service.
///
/// The service decorates labels with qualifiers, e.g. "Nitrogen(N)" or
/// "iron-Fe". The key is the text before the first '(' or '-', trimmed,
/// with its first character upper-cased and the rest left as is.
///
/// Neither separator takes priority: "nitrogen-N(x)" gives "Nitrogen", not
/// "Nitrogen-N" as a '('-first cut would.
pub fn derive_lookup_key(raw: &str) -> String {
    let head = match raw.find(['(', '-']) {
        Some(idx) => &raw[..idx],
        None => raw,
    };
    capitalize_first(head.trim())
}

/// Map a lookup key to a nutrient. Case-insensitive; accepts element
/// symbols and the misspellings the classifier labels are known to carry.
pub fn nutrient_for_key(key: &str) -> Option<Nutrient> {
    let lower = key.trim().to_lowercase();
    ALIASES.get(lower.as_str()).copied()
}

/// "KANDY district" -> "Kandy district"
pub fn sentence_case(s: &str) -> String {
    capitalize_first(&s.trim().to_lowercase())
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

static ALIASES: LazyLock<HashMap<&'static str, Nutrient>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    m.insert("nitrogen", Nutrient::Nitrogen);
    m.insert("n", Nutrient::Nitrogen);

    m.insert("phosphorus", Nutrient::Phosphorus);
    m.insert("phosphorous", Nutrient::Phosphorus);
    m.insert("p", Nutrient::Phosphorus);

    m.insert("potassium", Nutrient::Potassium);
    // coffee classifier label is "potasium-K"
    m.insert("potasium", Nutrient::Potassium);
    m.insert("k", Nutrient::Potassium);

    m.insert("magnesium", Nutrient::Magnesium);
    m.insert("mg", Nutrient::Magnesium);

    m.insert("iron", Nutrient::Iron);
    m.insert("fe", Nutrient::Iron);

    m
});
