use crate::error::NutriError;
use crate::knowledge::schema::AgronomyTable;
use crate::knowledge::validate_table;
use std::sync::{Arc, LazyLock};

const AGRONOMY_JSON: &str = include_str!("../../../../knowledge/agronomy.json");

static SHARED: LazyLock<Result<Arc<AgronomyTable>, String>> =
    LazyLock::new(|| load_builtin().map(Arc::new).map_err(|e| e.to_string()));

/// Process-wide builtin table, parsed on first use.
pub fn shared() -> Result<Arc<AgronomyTable>, NutriError> {
    SHARED
        .as_ref()
        .map(Arc::clone)
        .map_err(|e| NutriError::TableInvalid(e.clone()))
}

/// Load the agronomy table compiled into the binary.
pub fn load_builtin() -> Result<AgronomyTable, NutriError> {
    let table: AgronomyTable = serde_json::from_str(AGRONOMY_JSON)?;
    validate_table(&table)?;
    Ok(table)
}

/// Raw JSON of the builtin table, for export.
pub fn builtin_json() -> &'static str {
    AGRONOMY_JSON
}
