use serde::{Deserialize, Serialize};

use super::de::{scalar_string, status_label};
use super::named_ref::{ref_name, NamedRef};
use super::table_row::TableRow;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default, deserialize_with = "scalar_string")]
    pub id: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub email: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub phone: String,
    #[serde(default, deserialize_with = "status_label")]
    pub status: String,
    #[serde(default)]
    pub branch: Option<NamedRef>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub branch_name: String,
    #[serde(default)]
    pub designation: Option<NamedRef>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub designation_name: String,
    #[serde(default, alias = "joined_at", deserialize_with = "scalar_string")]
    pub joining_date: String,
}

impl TableRow for Employee {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Email", "Phone", "Branch", "Designation", "Joined", "Status"]
    }

    fn row_id(&self) -> &str {
        &self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.email.clone(),
            self.phone.clone(),
            ref_name(&self.branch, &self.branch_name),
            ref_name(&self.designation, &self.designation_name),
            self.joining_date.clone(),
            self.status.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employee_row_uses_embedded_branch() {
        let e: Employee = serde_json::from_value(serde_json::json!({
            "id": 7, "name": "Jo Baker", "email": "jo@bakery.test",
            "status": 1, "branch": {"id": 2, "name": "Harbour St"},
            "designation_name": "Pastry chef", "joined_at": "2023-05-01"
        }))
        .unwrap();
        let cells = e.cells();
        assert_eq!(e.row_id(), "7");
        assert_eq!(cells[4], "Harbour St");
        assert_eq!(cells[5], "Pastry chef");
        assert_eq!(cells[6], "2023-05-01");
        assert_eq!(cells[7], "Active");
    }
}
