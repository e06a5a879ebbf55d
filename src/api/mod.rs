// Backend API modules
pub mod auth;
pub mod client;
pub mod envelope;
pub mod error;
pub mod records;

// Re-export commonly used items
pub use auth::{change_password, login, LoginResponse, LoginUser};
pub use client::{set_silent, ApiClient};
pub use error::ApiError;
pub use records::{
    create_record, delete_record, fetch_page, fetch_record, fetch_table, table_headers, update_record,
    ResourceSource,
};
