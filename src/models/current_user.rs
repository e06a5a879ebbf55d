use serde::{Deserialize, Serialize};

use super::web_session::WebSession;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CurrentUser {
    pub name: String,
    pub role: String,
    pub branch_id: Option<String>,
}

impl From<&WebSession> for CurrentUser {
    fn from(s: &WebSession) -> Self {
        CurrentUser {
            name: s.display_name.clone(),
            role: s.claims.role.label().to_string(),
            branch_id: s.claims.branch_id.clone(),
        }
    }
}
