use serde::{Deserialize, Serialize};

use super::de::{scalar_string, status_label};
use super::named_ref::{ref_name, NamedRef};
use super::table_row::TableRow;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "scalar_string")]
    pub id: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub email: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub role: String,
    #[serde(default)]
    pub branch: Option<NamedRef>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub branch_name: String,
    #[serde(default, deserialize_with = "status_label")]
    pub status: String,
}

impl TableRow for User {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Email", "Role", "Branch", "Status"]
    }

    fn row_id(&self) -> &str {
        &self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.email.clone(),
            self.role.clone(),
            ref_name(&self.branch, &self.branch_name),
            self.status.clone(),
        ]
    }
}
