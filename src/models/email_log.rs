use serde::{Deserialize, Serialize};

use super::de::{scalar_string, status_label};
use super::table_row::TableRow;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailLog {
    #[serde(default, deserialize_with = "scalar_string")]
    pub id: String,
    #[serde(default, alias = "to", deserialize_with = "scalar_string")]
    pub recipient: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub subject: String,
    #[serde(default, deserialize_with = "status_label")]
    pub status: String,
    #[serde(default, alias = "error_message", deserialize_with = "scalar_string")]
    pub error: String,
    #[serde(default, alias = "created_at", deserialize_with = "scalar_string")]
    pub sent_at: String,
}

impl TableRow for EmailLog {
    fn headers() -> &'static [&'static str] {
        &["ID", "Recipient", "Subject", "Status", "Error", "Sent"]
    }

    fn row_id(&self) -> &str {
        &self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.recipient.clone(),
            self.subject.clone(),
            self.status.clone(),
            self.error.clone(),
            self.sent_at.clone(),
        ]
    }
}
