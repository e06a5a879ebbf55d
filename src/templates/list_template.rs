use askama::Template;

use super::base_template::{SelectOption, TemplateGlobals};
use crate::models::RowView;

pub struct FilterInput {
    pub key: String,
    pub label: String,
    pub input_type: String,
    pub value: String,
    pub options: Vec<SelectOption>,
    /// Forced by the session scope and not editable
    pub locked: bool,
}

#[derive(Template)]
#[template(path = "list.html")]
pub struct ListTemplate {
    pub globals: TemplateGlobals,
    pub title: String,
    pub slug: String,
    pub writable: bool,
    pub search: String,
    pub filters: Vec<FilterInput>,
    pub per_page_options: Vec<SelectOption>,
    pub headers: Vec<String>,
    pub column_count: usize,
    pub rows: Vec<RowView>,
    pub error: Option<String>,
    pub footer: String,
    pub prev_link: Option<String>,
    pub next_link: Option<String>,
}
