//! Authentication: token issuance, password hashing, request extractors.

mod middleware;
mod password;
mod token;

pub use middleware::{AdminUser, AuthUser};
pub use password::{hash_password, verify_password};
pub use token::{decode_token, issue_token, Claims};
