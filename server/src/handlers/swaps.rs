//! Swap request creation, settlement, and read-side queries.

use chrono::{DateTime, Utc};
use rewear_core::{settle, validate_request, ExchangeMode, Listing, ModerationStatus, SwapDecision};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{self, SettleOutcome, SwapWithDetails};
use crate::error::{AppError, Result};

/// Request body for creating a swap request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSwapRequest {
    pub item_id: Uuid,
    #[serde(rename = "type")]
    pub mode: ExchangeMode,
    #[serde(default)]
    pub points_offered: i64,
}

/// Acknowledgement for swap mutations.
#[derive(Debug, Serialize)]
pub struct SwapMutationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub message: String,
}

/// A swap joined with item and party display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResponse {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub item_id: Uuid,
    #[serde(rename = "type")]
    pub mode: String,
    pub points_offered: i64,
    pub status: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub item_title: String,
    pub item_images: Vec<String>,
    pub requester_name: String,
    pub owner_name: String,
}

impl From<SwapWithDetails> for SwapResponse {
    fn from(row: SwapWithDetails) -> Self {
        let swap = row.swap;
        SwapResponse {
            id: swap.id,
            requester_id: swap.requester_id,
            item_id: swap.item_id,
            mode: swap.mode,
            points_offered: swap.points_offered,
            status: swap.status,
            completed_at: swap.completed_at,
            created_at: swap.created_at,
            item_title: row.item_title,
            item_images: row.item_images,
            requester_name: row.requester_name,
            owner_name: row.owner_name,
        }
    }
}

/// Create a swap request.
///
/// All guards run before the insert; nothing about the item or any balance
/// changes until the owner accepts.
pub async fn handle_create_swap(
    pool: &PgPool,
    requester_id: Uuid,
    req: CreateSwapRequest,
) -> Result<SwapMutationResponse> {
    let item = db::find_item_by_id(pool, req.item_id)
        .await?
        .ok_or(rewear_core::Error::ItemNotAvailable)?;

    let listing = Listing {
        id: item.id,
        owner_id: item.owner_id,
        status: ModerationStatus::parse(&item.status)
            .ok_or_else(|| AppError::Internal(format!("Unknown item status: {}", item.status)))?,
        is_available: item.is_available,
    };

    let requester = db::find_user_by_id(pool, requester_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    validate_request(
        &listing,
        requester_id,
        req.mode,
        req.points_offered,
        requester.points,
    )?;

    let id = Uuid::new_v4();
    db::insert_swap(
        pool,
        id,
        requester_id,
        req.item_id,
        req.mode.as_str(),
        req.points_offered,
    )
    .await?;

    Ok(SwapMutationResponse {
        id: Some(id),
        message: "Swap request created successfully".to_string(),
    })
}

/// Settle a pending swap request as the item owner.
///
/// The settlement effects are computed by the domain core and persisted as a
/// single transaction; a concurrent settle of the same swap loses the
/// conditional status update and surfaces as a conflict.
pub async fn handle_settle_swap(
    pool: &PgPool,
    caller_id: Uuid,
    swap_id: Uuid,
    decision: SwapDecision,
) -> Result<SwapMutationResponse> {
    let view = db::settlement_view(pool, swap_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Swap request not found".to_string()))?;

    if view.owner_id != caller_id {
        return Err(AppError::Forbidden);
    }

    let status = rewear_core::SwapStatus::parse(&view.swap.status)
        .ok_or_else(|| AppError::Internal(format!("Unknown swap status: {}", view.swap.status)))?;
    let mode = ExchangeMode::parse(&view.swap.mode)
        .ok_or_else(|| AppError::Internal(format!("Unknown swap mode: {}", view.swap.mode)))?;

    let settlement = settle(
        decision,
        status,
        mode,
        view.swap.points_offered,
        view.swap.requester_id,
        view.owner_id,
        view.requester_balance,
    )?;

    match db::apply_settlement(pool, swap_id, view.swap.item_id, &settlement).await? {
        SettleOutcome::Applied => {}
        // Another request settled this swap between our read and write.
        SettleOutcome::NoLongerPending => {
            return Err(rewear_core::Error::AlreadyProcessed.into());
        }
        SettleOutcome::InsufficientPoints => {
            return Err(rewear_core::Error::InsufficientPoints.into());
        }
    }

    let message = match decision {
        SwapDecision::Accept => "Swap accepted successfully",
        SwapDecision::Reject => "Swap rejected successfully",
    };
    Ok(SwapMutationResponse {
        id: None,
        message: message.to_string(),
    })
}

/// Requests the caller has made.
pub async fn handle_my_requests(pool: &PgPool, user_id: Uuid) -> Result<Vec<SwapResponse>> {
    let rows = db::swaps_by_requester(pool, user_id).await?;
    Ok(rows.into_iter().map(SwapResponse::from).collect())
}

/// Pending requests awaiting the caller's decision.
pub async fn handle_my_items_swaps(pool: &PgPool, user_id: Uuid) -> Result<Vec<SwapResponse>> {
    let rows = db::pending_swaps_for_owner(pool, user_id).await?;
    Ok(rows.into_iter().map(SwapResponse::from).collect())
}

/// Settled history where the caller was requester or owner.
pub async fn handle_swap_history(pool: &PgPool, user_id: Uuid) -> Result<Vec<SwapResponse>> {
    let rows = db::settled_swaps_for_user(pool, user_id).await?;
    Ok(rows.into_iter().map(SwapResponse::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_parses_wire_format() {
        let parsed: CreateSwapRequest = serde_json::from_str(
            r#"{"itemId":"7f1a2b3c-4d5e-6f70-8192-a3b4c5d6e7f8","type":"points","pointsOffered":50}"#,
        )
        .unwrap();
        assert_eq!(parsed.mode, ExchangeMode::Points);
        assert_eq!(parsed.points_offered, 50);
    }

    #[test]
    fn points_offered_defaults_to_zero() {
        let parsed: CreateSwapRequest = serde_json::from_str(
            r#"{"itemId":"7f1a2b3c-4d5e-6f70-8192-a3b4c5d6e7f8","type":"swap"}"#,
        )
        .unwrap();
        assert_eq!(parsed.mode, ExchangeMode::Swap);
        assert_eq!(parsed.points_offered, 0);
    }

    #[test]
    fn unknown_mode_rejected() {
        let result: std::result::Result<CreateSwapRequest, _> = serde_json::from_str(
            r#"{"itemId":"7f1a2b3c-4d5e-6f70-8192-a3b4c5d6e7f8","type":"barter"}"#,
        );
        assert!(result.is_err());
    }
}
