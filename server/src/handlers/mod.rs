//! Request handlers: boundary validation plus orchestration of core rules
//! and database writes.

mod admin;
mod auth;
mod items;
mod swaps;
mod users;

pub use admin::*;
pub use auth::*;
pub use items::*;
pub use swaps::*;
pub use users::*;
