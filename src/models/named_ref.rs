use serde::{Deserialize, Serialize};

use super::de::scalar_string;

/// Embedded reference to a related record (`{"id": 3, "name": "Central"}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default, deserialize_with = "scalar_string")]
    pub id: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: String,
}

/// Name of an embedded reference, falling back to a flat `<x>_name` column.
pub fn ref_name(embedded: &Option<NamedRef>, flat: &str) -> String {
    match embedded {
        Some(r) if !r.name.is_empty() => r.name.clone(),
        _ => flat.to_string(),
    }
}
