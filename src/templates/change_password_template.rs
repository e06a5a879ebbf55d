use askama::Template;

use super::base_template::TemplateGlobals;

#[derive(Template)]
#[template(path = "change_password.html")]
pub struct ChangePasswordTemplate {
    pub globals: TemplateGlobals,
    /// Backend demanded a reset at login
    pub forced: bool,
    pub error: Option<String>,
}
