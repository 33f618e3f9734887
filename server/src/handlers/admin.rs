//! Moderation surface: listing review, user overrides, platform stats.

use chrono::{DateTime, Duration, Utc};
use rewear_core::{ModerationDecision, ModerationStatus};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, Result};
use crate::handlers::items::ItemResponse;

/// Activity feed window and caps.
const ACTIVITY_WINDOW_DAYS: i64 = 7;
const ACTIVITY_PER_SOURCE: i64 = 10;
const ACTIVITY_TOTAL: usize = 20;

/// A pending listing with uploader contact data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingItemResponse {
    #[serde(flatten)]
    pub item: ItemResponse,
    pub uploader_email: String,
}

/// A user with their listing count, password hash omitted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub points: i64,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub item_count: i64,
}

/// Request body for the points override.
#[derive(Debug, Deserialize)]
pub struct SetPointsRequest {
    pub points: i64,
}

/// Platform totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_users: i64,
    pub approved_items: i64,
    pub pending_items: i64,
    pub completed_swaps: i64,
    pub total_points: i64,
}

/// One entry of the recent-activity feed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub user_name: String,
    pub timestamp: DateTime<Utc>,
}

/// Simple acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Listings awaiting moderation.
pub async fn handle_pending_items(pool: &PgPool) -> Result<Vec<PendingItemResponse>> {
    let rows = db::pending_items(pool).await?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let uploader_email = row.uploader_email.clone();
            PendingItemResponse {
                item: row.into(),
                uploader_email,
            }
        })
        .collect())
}

/// Apply an admin verdict to a pending listing.
///
/// The transition is conditional on the stored status still being `pending`;
/// re-moderating an already-reviewed listing is a conflict.
pub async fn handle_review_item(
    pool: &PgPool,
    item_id: Uuid,
    decision: ModerationDecision,
) -> Result<MessageResponse> {
    let item = db::find_item_by_id(pool, item_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

    let status = ModerationStatus::parse(&item.status)
        .ok_or_else(|| AppError::Internal(format!("Unknown item status: {}", item.status)))?;
    let new_status = status.review(decision)?;

    // Conditional write: if another admin reviewed it between our read and
    // now, zero rows are affected and we surface the conflict.
    let applied = db::review_item(pool, item_id, new_status.as_str()).await?;
    if !applied {
        return Err(rewear_core::Error::NotPendingModeration.into());
    }

    let message = match decision {
        ModerationDecision::Approve => "Item approved successfully",
        ModerationDecision::Reject => "Item rejected successfully",
    };
    Ok(MessageResponse {
        message: message.to_string(),
    })
}

/// Hard delete a listing at any moderation status.
pub async fn handle_admin_delete_item(pool: &PgPool, item_id: Uuid) -> Result<MessageResponse> {
    let deleted = db::delete_item(pool, item_id).await?;
    if !deleted {
        return Err(AppError::NotFound("Item not found".to_string()));
    }
    Ok(MessageResponse {
        message: "Item removed successfully".to_string(),
    })
}

/// All users with their listing counts, newest first.
pub async fn handle_list_users(pool: &PgPool) -> Result<Vec<AdminUserResponse>> {
    let rows = db::list_users_with_item_counts(pool).await?;
    Ok(rows
        .into_iter()
        .map(|row| AdminUserResponse {
            id: row.user.id,
            name: row.user.name,
            email: row.user.email,
            points: row.user.points,
            is_admin: row.user.is_admin,
            created_at: row.user.created_at,
            item_count: row.item_count,
        })
        .collect())
}

/// Absolute overwrite of a user's points balance.
pub async fn handle_set_user_points(
    pool: &PgPool,
    user_id: Uuid,
    req: SetPointsRequest,
) -> Result<MessageResponse> {
    if req.points < 0 {
        return Err(AppError::Validation("Invalid points value".to_string()));
    }
    let updated = db::set_user_points(pool, user_id, req.points).await?;
    if !updated {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    Ok(MessageResponse {
        message: "User points updated successfully".to_string(),
    })
}

/// Toggle a user's admin flag.
pub async fn handle_toggle_admin(pool: &PgPool, user_id: Uuid) -> Result<MessageResponse> {
    let new_status = db::toggle_user_admin(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let message = if new_status {
        "User admin status enabled successfully"
    } else {
        "User admin status disabled successfully"
    };
    Ok(MessageResponse {
        message: message.to_string(),
    })
}

/// Platform totals.
pub async fn handle_stats(pool: &PgPool) -> Result<StatsResponse> {
    let total_users = db::count_users(pool).await?;
    let approved_items = db::count_items_by_status(pool, "approved").await?;
    let pending_items = db::count_items_by_status(pool, "pending").await?;
    let completed_swaps = db::count_swaps_by_status(pool, "accepted").await?;
    let total_points = db::total_points(pool).await?;

    Ok(StatsResponse {
        total_users,
        approved_items,
        pending_items,
        completed_swaps,
        total_points,
    })
}

/// Recent activity: listing creations and accepted swaps from the last week,
/// merged newest first.
pub async fn handle_activity(pool: &PgPool) -> Result<Vec<ActivityEntry>> {
    let since = Utc::now() - Duration::days(ACTIVITY_WINDOW_DAYS);

    let items = db::recent_items(pool, since, ACTIVITY_PER_SOURCE).await?;
    let swaps = db::recent_accepted_swaps(pool, since, ACTIVITY_PER_SOURCE).await?;

    let mut activity: Vec<ActivityEntry> = items
        .into_iter()
        .map(|i| ActivityEntry {
            kind: "item_created".to_string(),
            title: i.title,
            user_name: i.owner_name,
            timestamp: i.created_at,
        })
        .chain(swaps.into_iter().map(|s| ActivityEntry {
            kind: "swap_completed".to_string(),
            title: s.item_title,
            user_name: s.requester_name,
            timestamp: s.completed_at,
        }))
        .collect();

    activity.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    activity.truncate(ACTIVITY_TOTAL);
    Ok(activity)
}
