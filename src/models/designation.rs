use serde::{Deserialize, Serialize};

use super::de::scalar_string;
use super::table_row::TableRow;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Designation {
    #[serde(default, deserialize_with = "scalar_string")]
    pub id: String,
    #[serde(default, alias = "title", deserialize_with = "scalar_string")]
    pub name: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub description: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub employees_count: String,
}

impl TableRow for Designation {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Description", "Employees"]
    }

    fn row_id(&self) -> &str {
        &self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.description.clone(),
            self.employees_count.clone(),
        ]
    }
}
