//! Moderation endpoints (admin auth required).

use axum::{
    extract::{Path, State},
    routing::{delete, get, put},
    Json, Router,
};
use rewear_core::ModerationDecision;
use uuid::Uuid;

use crate::auth::AdminUser;
use crate::error::Result;
use crate::handlers::{
    handle_activity, handle_admin_delete_item, handle_list_users, handle_pending_items,
    handle_review_item, handle_set_user_points, handle_stats, handle_toggle_admin, ActivityEntry,
    AdminUserResponse, MessageResponse, PendingItemResponse, SetPointsRequest, StatsResponse,
};
use crate::AppState;

/// Create admin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/pending-items", get(pending_items_handler))
        .route("/admin/items/{id}/approve", put(approve_handler))
        .route("/admin/items/{id}/reject", put(reject_handler))
        .route("/admin/items/{id}", delete(delete_item_handler))
        .route("/admin/users", get(users_handler))
        .route("/admin/users/{id}/points", put(points_handler))
        .route("/admin/users/{id}/admin", put(toggle_admin_handler))
        .route("/admin/stats", get(stats_handler))
        .route("/admin/activity", get(activity_handler))
}

/// GET /admin/pending-items - Listings awaiting moderation.
async fn pending_items_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<PendingItemResponse>>> {
    let response = handle_pending_items(&state.pool).await?;
    Ok(Json(response))
}

/// PUT /admin/items/{id}/approve - Approve a pending listing.
async fn approve_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    let response = handle_review_item(&state.pool, id, ModerationDecision::Approve).await?;
    Ok(Json(response))
}

/// PUT /admin/items/{id}/reject - Reject a pending listing.
async fn reject_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    let response = handle_review_item(&state.pool, id, ModerationDecision::Reject).await?;
    Ok(Json(response))
}

/// DELETE /admin/items/{id} - Remove a listing at any status.
async fn delete_item_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    let response = handle_admin_delete_item(&state.pool, id).await?;
    Ok(Json(response))
}

/// GET /admin/users - All users with listing counts.
async fn users_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<AdminUserResponse>>> {
    let response = handle_list_users(&state.pool).await?;
    Ok(Json(response))
}

/// PUT /admin/users/{id}/points - Overwrite a user's balance.
async fn points_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<SetPointsRequest>,
) -> Result<Json<MessageResponse>> {
    let response = handle_set_user_points(&state.pool, id, request).await?;
    Ok(Json(response))
}

/// PUT /admin/users/{id}/admin - Toggle a user's admin flag.
async fn toggle_admin_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    let response = handle_toggle_admin(&state.pool, id).await?;
    Ok(Json(response))
}

/// GET /admin/stats - Platform totals.
async fn stats_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<StatsResponse>> {
    let response = handle_stats(&state.pool).await?;
    Ok(Json(response))
}

/// GET /admin/activity - Recent listing and swap activity.
async fn activity_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<ActivityEntry>>> {
    let response = handle_activity(&state.pool).await?;
    Ok(Json(response))
}
