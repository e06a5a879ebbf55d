use askama::Template;

use super::base_template::TemplateGlobals;

pub struct DashboardCard {
    pub label: String,
    pub href: String,
    pub total: Option<u64>,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub globals: TemplateGlobals,
    pub role_label: String,
    pub cards: Vec<DashboardCard>,
}
