//! Domain records shared by the store, the remote API, and local storage.
//!
//! Field names are camelCase on every boundary. Records coming from the
//! remote API may carry their identifier as `_id`.

pub mod order;
pub mod user;

pub use order::{NewOrder, Order};
pub use user::{NewUser, User};
