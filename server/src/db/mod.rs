//! Database module for PostgreSQL persistence.

mod items;
mod pool;
mod swaps;
mod users;

pub use items::*;
pub use pool::*;
pub use swaps::*;
pub use users::*;
