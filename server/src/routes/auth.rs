//! Identity endpoints.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::auth::AuthUser;
use crate::error::Result;
use crate::handlers::{
    handle_login, handle_profile, handle_register, LoginRequest, ProfileResponse, RegisterRequest,
    TokenResponse,
};
use crate::AppState;

/// Create auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/profile", get(profile_handler))
}

/// POST /auth/register - Create an account and issue a session token.
async fn register_handler(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>> {
    let response = handle_register(&state.pool, &state.config, request).await?;
    Ok(Json(response))
}

/// POST /auth/login - Verify credentials and issue a session token.
async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let response = handle_login(&state.pool, &state.config, request).await?;
    Ok(Json(response))
}

/// GET /auth/profile - Current user's profile.
async fn profile_handler(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ProfileResponse>> {
    let response = handle_profile(&state.pool, auth.id).await?;
    Ok(Json(response))
}
