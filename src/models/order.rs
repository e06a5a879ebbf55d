use serde::{Deserialize, Serialize};

use super::de::{scalar_string, status_label};
use super::named_ref::{ref_name, NamedRef};
use super::table_row::TableRow;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, deserialize_with = "scalar_string")]
    pub id: String,
    #[serde(default, alias = "order_number", deserialize_with = "scalar_string")]
    pub order_no: String,
    #[serde(default)]
    pub branch: Option<NamedRef>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub branch_name: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub items_count: String,
    #[serde(default, alias = "total", deserialize_with = "scalar_string")]
    pub total_amount: String,
    #[serde(default, deserialize_with = "status_label")]
    pub status: String,
    #[serde(default, alias = "created_at", deserialize_with = "scalar_string")]
    pub order_date: String,
}

impl TableRow for Order {
    fn headers() -> &'static [&'static str] {
        &["ID", "Order #", "Branch", "Items", "Total", "Date", "Status"]
    }

    fn row_id(&self) -> &str {
        &self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.order_no.clone(),
            ref_name(&self.branch, &self.branch_name),
            self.items_count.clone(),
            self.total_amount.clone(),
            self.order_date.clone(),
            self.status.clone(),
        ]
    }
}
