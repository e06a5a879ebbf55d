//! Client-side session: token storage, unverified claim decoding and
//! role-driven navigation.

pub mod claims;
pub mod error;
pub mod role;
pub mod store;

pub use claims::{decode_claims, Claims};
pub use error::SessionError;
pub use role::{MenuItem, Role};
pub use store::SessionStore;
