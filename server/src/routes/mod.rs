//! HTTP route definitions.

mod admin;
mod auth;
mod health;
mod items;
mod swaps;
mod users;

use crate::AppState;
use axum::Router;

/// Create all application routes.
pub fn create_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(items::routes())
        .merge(swaps::routes())
        .merge(admin::routes())
        .merge(users::routes())
}
