use serde::{Deserialize, Serialize};

use super::de::scalar_string;
use super::named_ref::{ref_name, NamedRef};
use super::table_row::TableRow;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditLog {
    #[serde(default, deserialize_with = "scalar_string")]
    pub id: String,
    #[serde(default)]
    pub user: Option<NamedRef>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub user_name: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub action: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub description: String,
    #[serde(default, alias = "ip", deserialize_with = "scalar_string")]
    pub ip_address: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub created_at: String,
}

impl TableRow for AuditLog {
    fn headers() -> &'static [&'static str] {
        &["ID", "User", "Action", "Description", "IP", "At"]
    }

    fn row_id(&self) -> &str {
        &self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            ref_name(&self.user, &self.user_name),
            self.action.clone(),
            self.description.clone(),
            self.ip_address.clone(),
            self.created_at.clone(),
        ]
    }
}
