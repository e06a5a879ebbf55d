use serde::{Deserialize, Serialize};

use super::de::scalar_string;
use super::named_ref::{ref_name, NamedRef};
use super::table_row::TableRow;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockEntry {
    #[serde(default, deserialize_with = "scalar_string")]
    pub id: String,
    #[serde(default)]
    pub item: Option<NamedRef>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub item_name: String,
    #[serde(default)]
    pub branch: Option<NamedRef>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub branch_name: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub quantity: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub unit: String,
    #[serde(default, rename = "type", alias = "entry_type", deserialize_with = "scalar_string")]
    pub entry_type: String,
    #[serde(default, alias = "created_at", deserialize_with = "scalar_string")]
    pub entry_date: String,
}

impl TableRow for StockEntry {
    fn headers() -> &'static [&'static str] {
        &["ID", "Item", "Branch", "Quantity", "Unit", "Type", "Date"]
    }

    fn row_id(&self) -> &str {
        &self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            ref_name(&self.item, &self.item_name),
            ref_name(&self.branch, &self.branch_name),
            self.quantity.clone(),
            self.unit.clone(),
            self.entry_type.clone(),
            self.entry_date.clone(),
        ]
    }
}
