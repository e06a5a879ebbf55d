//! Debounced search-and-paginate list controller and its state.

pub mod controller;
pub mod notify;
pub mod query;
pub mod state;

pub use controller::{ListController, ListOptions, PageSource};
pub use notify::{Notifier, Toast, ToastLevel, ToastReceiver};
pub use query::{Filters, ListQuery, SEARCH_KEY};
pub use state::{ListState, ListStatus};
