//! Administration client for the bakery chain backend.
//!
//! The crate exposes a typed REST client (`api`), the role-aware session
//! layer (`session`), the debounced search-and-paginate list controller
//! (`list`) and the server-rendered admin panel (`handlers`, `templates`,
//! `routes`). The `bakehouse` binary wires them to a CLI.

pub mod api;
pub mod browse;
pub mod config;
pub mod handlers;
pub mod list;
pub mod models;
pub mod output;
pub mod routes;
pub mod session;
pub mod templates;
pub mod utils;
