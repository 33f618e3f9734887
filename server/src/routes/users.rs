//! Profile-scoped endpoints.

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::Result;
use crate::handlers::{
    handle_public_profile, handle_update_profile, handle_user_active_swaps, handle_user_items,
    handle_user_swaps, ItemResponse, MessageResponse, PublicProfileResponse, SwapResponse,
    UpdateProfileRequest,
};
use crate::AppState;

/// Create user routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/profile", put(update_profile_handler))
        .route("/users/{id}", get(profile_handler))
        .route("/users/{id}/items", get(items_handler))
        .route("/users/{id}/swaps", get(swaps_handler))
        .route("/users/{id}/active-swaps", get(active_swaps_handler))
}

/// PUT /users/profile - Update the caller's display name.
async fn update_profile_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<MessageResponse>> {
    let response = handle_update_profile(&state.pool, auth.id, request).await?;
    Ok(Json(response))
}

/// GET /users/{id} - Public profile with exchange counts.
async fn profile_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicProfileResponse>> {
    let response = handle_public_profile(&state.pool, id).await?;
    Ok(Json(response))
}

/// GET /users/{id}/items - A user's approved listings.
async fn items_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ItemResponse>>> {
    let response = handle_user_items(&state.pool, id).await?;
    Ok(Json(response))
}

/// GET /users/{id}/swaps - A user's settled swap history.
async fn swaps_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<SwapResponse>>> {
    let response = handle_user_swaps(&state.pool, id).await?;
    Ok(Json(response))
}

/// GET /users/{id}/active-swaps - A user's pending swaps.
async fn active_swaps_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<SwapResponse>>> {
    let response = handle_user_active_swaps(&state.pool, id).await?;
    Ok(Json(response))
}
