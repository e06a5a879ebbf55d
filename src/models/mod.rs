pub mod app_state;
pub mod audit_log;
pub mod branch;
pub mod current_user;
pub mod de;
pub mod designation;
pub mod email_log;
pub mod employee;
pub mod item;
pub mod named_ref;
pub mod order;
pub mod pagination;
pub mod resource;
pub mod stock_entry;
pub mod table_row;
pub mod user;
pub mod validation;
pub mod web_session;

pub use app_state::AppState;
pub use audit_log::AuditLog;
pub use branch::Branch;
pub use current_user::CurrentUser;
pub use designation::Designation;
pub use email_log::EmailLog;
pub use employee::Employee;
pub use item::Item;
pub use named_ref::NamedRef;
pub use order::Order;
pub use pagination::{Page, Pagination};
pub use resource::{FieldKind, FieldSpec, FilterSpec, Resource};
pub use stock_entry::StockEntry;
pub use table_row::{RowView, TablePage, TableRow};
pub use user::User;
pub use validation::{validate_filter, validate_filters, validate_record, FormMode};
pub use web_session::WebSession;
