use serde::{Deserialize, Serialize};

use super::de::{scalar_string, status_label};
use super::table_row::TableRow;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Branch {
    #[serde(default, deserialize_with = "scalar_string")]
    pub id: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: String,
    #[serde(default, alias = "branch_code", deserialize_with = "scalar_string")]
    pub code: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub address: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub phone: String,
    #[serde(default, deserialize_with = "status_label")]
    pub status: String,
}

impl TableRow for Branch {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Code", "Address", "Phone", "Status"]
    }

    fn row_id(&self) -> &str {
        &self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.code.clone(),
            self.address.clone(),
            self.phone.clone(),
            self.status.clone(),
        ]
    }
}
