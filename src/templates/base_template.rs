use crate::list::Toast;
use crate::models::CurrentUser;
use crate::session::MenuItem;

/// Context shared by every page: who is logged in, their menu and pending flashes.
#[derive(Default)]
pub struct TemplateGlobals {
    pub current_user: Option<CurrentUser>,
    pub api_hostname: String,
    pub menu: Vec<MenuItem>,
    pub flash_messages: Vec<Toast>,
    pub has_flash_messages: bool,
}

/// One `<option>` of a select.
pub struct SelectOption {
    pub value: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn list<S: AsRef<str>>(options: &[S], current: &str) -> Vec<SelectOption> {
        options
            .iter()
            .map(|o| SelectOption {
                value: o.as_ref().to_string(),
                selected: o.as_ref() == current,
            })
            .collect()
    }
}
