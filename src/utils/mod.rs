// URL handling utilities
pub mod query_string;
pub mod url_parser;

// Parsing utilities
pub mod key_value;

// JSON utilities
pub mod json_converter;

// Re-export all utilities for convenient access
pub use json_converter::value_to_short_string;
pub use key_value::parse_key_value;
pub use query_string::{build_query_string, link_with_query};
pub use url_parser::hostname_from_url;
