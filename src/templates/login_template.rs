use askama::Template;

use super::base_template::TemplateGlobals;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub globals: TemplateGlobals,
    pub email: String,
    pub error: Option<String>,
}
