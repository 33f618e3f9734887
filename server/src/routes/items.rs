//! Listing endpoints.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::Result;
use crate::handlers::{
    handle_create_item, handle_delete_item, handle_featured_items, handle_get_item,
    handle_list_items, handle_update_item, handle_user_items, ItemMutationResponse, ItemResponse,
    ListingQuery,
};
use crate::storage::{read_item_form, MAX_IMAGES, MAX_IMAGE_BYTES};
use crate::AppState;

/// Create item routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_handler).post(create_handler))
        .route("/items/featured", get(featured_handler))
        .route(
            "/items/{id}",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .route("/items/user/{user_id}", get(user_items_handler))
        // Five images at 5 MB each, plus form fields.
        .layer(DefaultBodyLimit::max(
            (MAX_IMAGES * MAX_IMAGE_BYTES) + 64 * 1024,
        ))
}

/// GET /items - Public listings with optional filters.
async fn list_handler(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<Vec<ItemResponse>>> {
    let response = handle_list_items(&state.pool, query).await?;
    Ok(Json(response))
}

/// GET /items/featured - Newest public listings, capped.
async fn featured_handler(State(state): State<AppState>) -> Result<Json<Vec<ItemResponse>>> {
    let response = handle_featured_items(&state.pool).await?;
    Ok(Json(response))
}

/// GET /items/{id} - Single listing detail.
async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ItemResponse>> {
    let response = handle_get_item(&state.pool, id).await?;
    Ok(Json(response))
}

/// POST /items - Create a listing (multipart, up to 5 images).
async fn create_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<Json<ItemMutationResponse>> {
    let (form, images) = read_item_form(multipart, &state.config.upload_dir).await?;
    let response = handle_create_item(&state.pool, auth.id, form, images).await?;
    Ok(Json(response))
}

/// PUT /items/{id} - Update an owned listing.
async fn update_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ItemMutationResponse>> {
    let (form, images) = read_item_form(multipart, &state.config.upload_dir).await?;
    let response = handle_update_item(&state.pool, auth.id, id, form, images).await?;
    Ok(Json(response))
}

/// DELETE /items/{id} - Delete an owned listing.
async fn delete_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ItemMutationResponse>> {
    let response = handle_delete_item(&state.pool, auth.id, id).await?;
    Ok(Json(response))
}

/// GET /items/user/{user_id} - A user's approved listings.
async fn user_items_handler(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<ItemResponse>>> {
    let response = handle_user_items(&state.pool, user_id).await?;
    Ok(Json(response))
}
