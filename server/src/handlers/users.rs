//! Profile-scoped queries and profile updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::handlers::admin::MessageResponse;
use crate::handlers::swaps::SwapResponse;

/// Request body for profile updates.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
}

/// Public view of a user: display data and exchange track record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub points: i64,
    pub created_at: DateTime<Utc>,
    pub item_count: i64,
    pub completed_swaps: i64,
}

/// Public profile with approved-item and accepted-swap counts.
pub async fn handle_public_profile(pool: &PgPool, user_id: Uuid) -> Result<PublicProfileResponse> {
    let profile = db::public_profile(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(PublicProfileResponse {
        id: profile.id,
        name: profile.name,
        points: profile.points,
        created_at: profile.created_at,
        item_count: profile.item_count,
        completed_swaps: profile.completed_swaps,
    })
}

/// Update the caller's display name.
pub async fn handle_update_profile(
    pool: &PgPool,
    user_id: Uuid,
    req: UpdateProfileRequest,
) -> Result<MessageResponse> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    let updated = db::update_user_name(pool, user_id, name).await?;
    if !updated {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    Ok(MessageResponse {
        message: "Profile updated successfully".to_string(),
    })
}

/// A user's settled swap history.
pub async fn handle_user_swaps(pool: &PgPool, user_id: Uuid) -> Result<Vec<SwapResponse>> {
    let rows = db::settled_swaps_for_user(pool, user_id).await?;
    Ok(rows.into_iter().map(SwapResponse::from).collect())
}

/// A user's pending swaps, as requester or owner.
pub async fn handle_user_active_swaps(pool: &PgPool, user_id: Uuid) -> Result<Vec<SwapResponse>> {
    let rows = db::pending_swaps_for_user(pool, user_id).await?;
    Ok(rows.into_iter().map(SwapResponse::from).collect())
}
