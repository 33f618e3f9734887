//! Swap request endpoints.

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use rewear_core::SwapDecision;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::Result;
use crate::handlers::{
    handle_create_swap, handle_my_items_swaps, handle_my_requests, handle_settle_swap,
    handle_swap_history, CreateSwapRequest, SwapMutationResponse, SwapResponse,
};
use crate::AppState;

/// Create swap routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/swaps", post(create_handler))
        .route("/swaps/my-requests", get(my_requests_handler))
        .route("/swaps/my-items", get(my_items_handler))
        .route("/swaps/history", get(history_handler))
        .route("/swaps/{id}/accept", put(accept_handler))
        .route("/swaps/{id}/reject", put(reject_handler))
}

/// POST /swaps - Create a swap request.
async fn create_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateSwapRequest>,
) -> Result<Json<SwapMutationResponse>> {
    let response = handle_create_swap(&state.pool, auth.id, request).await?;
    Ok(Json(response))
}

/// GET /swaps/my-requests - Requests the caller has made.
async fn my_requests_handler(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<SwapResponse>>> {
    let response = handle_my_requests(&state.pool, auth.id).await?;
    Ok(Json(response))
}

/// GET /swaps/my-items - Pending requests targeting the caller's items.
async fn my_items_handler(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<SwapResponse>>> {
    let response = handle_my_items_swaps(&state.pool, auth.id).await?;
    Ok(Json(response))
}

/// GET /swaps/history - Settled swaps involving the caller.
async fn history_handler(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<SwapResponse>>> {
    let response = handle_swap_history(&state.pool, auth.id).await?;
    Ok(Json(response))
}

/// PUT /swaps/{id}/accept - Accept a pending request (owner only).
async fn accept_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SwapMutationResponse>> {
    let response = handle_settle_swap(&state.pool, auth.id, id, SwapDecision::Accept).await?;
    Ok(Json(response))
}

/// PUT /swaps/{id}/reject - Reject a pending request (owner only).
async fn reject_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SwapMutationResponse>> {
    let response = handle_settle_swap(&state.pool, auth.id, id, SwapDecision::Reject).await?;
    Ok(Json(response))
}
