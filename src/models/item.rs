use serde::{Deserialize, Serialize};

use super::de::{scalar_string, status_label};
use super::table_row::TableRow;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, deserialize_with = "scalar_string")]
    pub id: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub sku: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub category: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub unit: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub price: String,
    #[serde(default, deserialize_with = "status_label")]
    pub status: String,
}

impl TableRow for Item {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "SKU", "Category", "Unit", "Price", "Status"]
    }

    fn row_id(&self) -> &str {
        &self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.sku.clone(),
            self.category.clone(),
            self.unit.clone(),
            self.price.clone(),
            self.status.clone(),
        ]
    }
}
