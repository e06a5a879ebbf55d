use askama::Template;

use super::base_template::{SelectOption, TemplateGlobals};

pub struct FormInput {
    pub name: String,
    pub label: String,
    pub input_type: String,
    pub value: String,
    pub required: bool,
    pub options: Vec<SelectOption>,
}

#[derive(Template)]
#[template(path = "form.html")]
pub struct FormTemplate {
    pub globals: TemplateGlobals,
    pub title: String,
    pub action: String,
    pub back_link: String,
    pub submit_label: String,
    pub fields: Vec<FormInput>,
    pub error: Option<String>,
}
