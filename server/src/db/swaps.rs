//! Database operations for the swaps table, including settlement.

use chrono::{DateTime, Utc};
use rewear_core::Settlement;
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

/// A stored swap row from the database.
#[derive(Debug, Clone)]
pub struct StoredSwap {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub item_id: Uuid,
    pub mode: String,
    pub points_offered: i64,
    pub status: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for StoredSwap {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(StoredSwap {
            id: row.try_get("id")?,
            requester_id: row.try_get("requester_id")?,
            item_id: row.try_get("item_id")?,
            mode: row.try_get("mode")?,
            points_offered: row.try_get("points_offered")?,
            status: row.try_get("status")?,
            completed_at: row.try_get("completed_at")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// A swap joined with item and party display data for read-side queries.
#[derive(Debug)]
pub struct SwapWithDetails {
    pub swap: StoredSwap,
    pub item_title: String,
    pub item_images: Vec<String>,
    pub requester_name: String,
    pub owner_name: String,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for SwapWithDetails {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(SwapWithDetails {
            swap: StoredSwap::from_row(row)?,
            item_title: row.try_get("item_title")?,
            item_images: row.try_get("item_images")?,
            requester_name: row.try_get("requester_name")?,
            owner_name: row.try_get("owner_name")?,
        })
    }
}

/// Everything settlement needs in one read: the swap, the item's owner, and
/// the requester's current balance.
#[derive(Debug)]
pub struct SettlementView {
    pub swap: StoredSwap,
    pub owner_id: Uuid,
    pub requester_balance: i64,
}

const SWAP_DETAIL_COLUMNS: &str = r#"
    s.id, s.requester_id, s.item_id, s.mode, s.points_offered, s.status,
    s.completed_at, s.created_at,
    i.title AS item_title, i.images AS item_images,
    r.name AS requester_name, o.name AS owner_name
"#;

const SWAP_DETAIL_JOINS: &str = r#"
    FROM swaps s
    JOIN items i ON i.id = s.item_id
    JOIN users r ON r.id = s.requester_id
    JOIN users o ON o.id = i.owner_id
"#;

/// Insert a new pending swap request.
pub async fn insert_swap(
    pool: &PgPool,
    id: Uuid,
    requester_id: Uuid,
    item_id: Uuid,
    mode: &str,
    points_offered: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO swaps (id, requester_id, item_id, mode, points_offered, status)
        VALUES ($1, $2, $3, $4, $5, 'pending')
        "#,
    )
    .bind(id)
    .bind(requester_id)
    .bind(item_id)
    .bind(mode)
    .bind(points_offered)
    .execute(pool)
    .await?;
    Ok(())
}

/// Load a swap with the context the settlement workflow needs.
pub async fn settlement_view(
    pool: &PgPool,
    swap_id: Uuid,
) -> Result<Option<SettlementView>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT s.id, s.requester_id, s.item_id, s.mode, s.points_offered,
               s.status, s.completed_at, s.created_at,
               i.owner_id, r.points AS requester_balance
        FROM swaps s
        JOIN items i ON i.id = s.item_id
        JOIN users r ON r.id = s.requester_id
        WHERE s.id = $1
        "#,
    )
    .bind(swap_id)
    .fetch_optional(pool)
    .await?;

    row.map(|r| {
        Ok(SettlementView {
            swap: StoredSwap::from_row(&r)?,
            owner_id: r.try_get("owner_id")?,
            requester_balance: r.try_get("requester_balance")?,
        })
    })
    .transpose()
}

/// Outcome of attempting to persist a settlement.
#[derive(Debug, PartialEq, Eq)]
pub enum SettleOutcome {
    /// All writes landed and the transaction committed.
    Applied,
    /// The swap was no longer pending; nothing changed.
    NoLongerPending,
    /// The requester's balance no longer covered the offer; nothing changed.
    InsufficientPoints,
}

/// Persist a computed [`Settlement`] as one atomic unit.
///
/// The status write is conditional on the stored status still being
/// `pending`, which closes the race window between reading the swap and
/// settling it: whichever request commits first wins, the other observes
/// zero rows affected and rolls back. The balance debit is likewise
/// conditional on sufficiency, so acceptance re-validates points instead of
/// trusting the creation-time check.
pub async fn apply_settlement(
    pool: &PgPool,
    swap_id: Uuid,
    item_id: Uuid,
    settlement: &Settlement,
) -> Result<SettleOutcome, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        r#"
        UPDATE swaps SET status = $2, completed_at = NOW()
        WHERE id = $1 AND status = 'pending'
        "#,
    )
    .bind(swap_id)
    .bind(settlement.new_status.as_str())
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(SettleOutcome::NoLongerPending);
    }

    if settlement.reserve_item {
        sqlx::query(r#"UPDATE items SET is_available = FALSE, updated_at = NOW() WHERE id = $1"#)
            .bind(item_id)
            .execute(&mut *tx)
            .await?;
    }

    if let Some(transfer) = &settlement.transfer {
        let debited = sqlx::query(
            r#"UPDATE users SET points = points - $2 WHERE id = $1 AND points >= $2"#,
        )
        .bind(transfer.from)
        .bind(transfer.amount)
        .execute(&mut *tx)
        .await?;

        if debited.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(SettleOutcome::InsufficientPoints);
        }

        sqlx::query(r#"UPDATE users SET points = points + $2 WHERE id = $1"#)
            .bind(transfer.to)
            .bind(transfer.amount)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(SettleOutcome::Applied)
}

/// Requests the user has made, newest first.
pub async fn swaps_by_requester(
    pool: &PgPool,
    requester_id: Uuid,
) -> Result<Vec<SwapWithDetails>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {SWAP_DETAIL_COLUMNS}
        {SWAP_DETAIL_JOINS}
        WHERE s.requester_id = $1
        ORDER BY s.created_at DESC
        "#
    );
    sqlx::query_as::<_, SwapWithDetails>(&sql)
        .bind(requester_id)
        .fetch_all(pool)
        .await
}

/// Pending requests targeting the user's items, newest first.
pub async fn pending_swaps_for_owner(
    pool: &PgPool,
    owner_id: Uuid,
) -> Result<Vec<SwapWithDetails>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {SWAP_DETAIL_COLUMNS}
        {SWAP_DETAIL_JOINS}
        WHERE i.owner_id = $1 AND s.status = 'pending'
        ORDER BY s.created_at DESC
        "#
    );
    sqlx::query_as::<_, SwapWithDetails>(&sql)
        .bind(owner_id)
        .fetch_all(pool)
        .await
}

/// Settled swaps where the user is requester or item owner, newest
/// completion first.
pub async fn settled_swaps_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<SwapWithDetails>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {SWAP_DETAIL_COLUMNS}
        {SWAP_DETAIL_JOINS}
        WHERE (s.requester_id = $1 OR i.owner_id = $1)
          AND s.status IN ('accepted', 'rejected')
        ORDER BY s.completed_at DESC
        "#
    );
    sqlx::query_as::<_, SwapWithDetails>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

/// Pending swaps where the user is requester or item owner, newest first.
pub async fn pending_swaps_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<SwapWithDetails>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {SWAP_DETAIL_COLUMNS}
        {SWAP_DETAIL_JOINS}
        WHERE (s.requester_id = $1 OR i.owner_id = $1)
          AND s.status = 'pending'
        ORDER BY s.created_at DESC
        "#
    );
    sqlx::query_as::<_, SwapWithDetails>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

/// Count swaps in a given status.
pub async fn count_swaps_by_status(pool: &PgPool, status: &str) -> Result<i64, sqlx::Error> {
    let result: (i64,) = sqlx::query_as(r#"SELECT COUNT(*) FROM swaps WHERE status = $1"#)
        .bind(status)
        .fetch_one(pool)
        .await?;
    Ok(result.0)
}

/// A recently accepted swap, for the admin activity feed.
#[derive(Debug)]
pub struct RecentSwap {
    pub item_title: String,
    pub requester_name: String,
    pub completed_at: DateTime<Utc>,
}

/// Swaps accepted within the window, newest completion first.
pub async fn recent_accepted_swaps(
    pool: &PgPool,
    since: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<RecentSwap>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT i.title AS item_title, r.name AS requester_name, s.completed_at
        FROM swaps s
        JOIN items i ON i.id = s.item_id
        JOIN users r ON r.id = s.requester_id
        WHERE s.status = 'accepted' AND s.completed_at >= $1
        ORDER BY s.completed_at DESC
        LIMIT $2
        "#,
    )
    .bind(since)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|r| {
            Ok(RecentSwap {
                item_title: r.try_get("item_title")?,
                requester_name: r.try_get("requester_name")?,
                completed_at: r.try_get("completed_at")?,
            })
        })
        .collect()
}
