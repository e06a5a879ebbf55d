// Shared page context
pub mod base_template;
pub use base_template::{SelectOption, TemplateGlobals};

// Individual template files
pub mod change_password_template;
pub mod dashboard_template;
pub mod form_template;
pub mod list_template;
pub mod login_template;

// Re-export all templates
pub use change_password_template::ChangePasswordTemplate;
pub use dashboard_template::{DashboardCard, DashboardTemplate};
pub use form_template::{FormInput, FormTemplate};
pub use list_template::{FilterInput, ListTemplate};
pub use login_template::LoginTemplate;
