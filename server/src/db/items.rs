//! Database operations for the items table.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

/// A stored item row from the database.
#[derive(Debug, Clone)]
pub struct StoredItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub garment_type: String,
    pub size: String,
    pub condition: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub points: i64,
    pub owner_id: Uuid,
    pub status: String,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for StoredItem {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(StoredItem {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            category: row.try_get("category")?,
            garment_type: row.try_get("garment_type")?,
            size: row.try_get("size")?,
            condition: row.try_get("condition")?,
            tags: row.try_get("tags")?,
            images: row.try_get("images")?,
            points: row.try_get("points")?,
            owner_id: row.try_get("owner_id")?,
            status: row.try_get("status")?,
            is_available: row.try_get("is_available")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// An item row joined with uploader display data.
#[derive(Debug)]
pub struct ItemWithUploader {
    pub item: StoredItem,
    pub uploader_name: String,
    pub uploader_email: String,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for ItemWithUploader {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(ItemWithUploader {
            item: StoredItem::from_row(row)?,
            uploader_name: row.try_get("uploader_name")?,
            uploader_email: row.try_get("uploader_email")?,
        })
    }
}

/// Filters accepted by the public listing query.
#[derive(Debug, Default)]
pub struct ListingFilter {
    pub category: Option<String>,
    pub garment_type: Option<String>,
    pub search: Option<String>,
}

const ITEM_WITH_UPLOADER_COLUMNS: &str = r#"
    i.id, i.title, i.description, i.category, i.garment_type, i.size,
    i.condition, i.tags, i.images, i.points, i.owner_id, i.status,
    i.is_available, i.created_at, i.updated_at,
    u.name AS uploader_name, u.email AS uploader_email
"#;

/// Public listings: approved and available only, with optional filters,
/// newest first.
pub async fn list_public_items(
    pool: &PgPool,
    filter: &ListingFilter,
) -> Result<Vec<ItemWithUploader>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {ITEM_WITH_UPLOADER_COLUMNS}
        FROM items i
        JOIN users u ON u.id = i.owner_id
        WHERE i.status = 'approved' AND i.is_available
          AND ($1::text IS NULL OR i.category = $1)
          AND ($2::text IS NULL OR i.garment_type = $2)
          AND ($3::text IS NULL
               OR i.title ILIKE '%' || $3 || '%'
               OR i.description ILIKE '%' || $3 || '%'
               OR EXISTS (SELECT 1 FROM unnest(i.tags) t WHERE t ILIKE '%' || $3 || '%'))
        ORDER BY i.created_at DESC
        "#
    );
    sqlx::query_as::<_, ItemWithUploader>(&sql)
        .bind(&filter.category)
        .bind(&filter.garment_type)
        .bind(&filter.search)
        .fetch_all(pool)
        .await
}

/// Featured listings: the public query capped to the newest few.
pub async fn featured_items(pool: &PgPool, limit: i64) -> Result<Vec<ItemWithUploader>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {ITEM_WITH_UPLOADER_COLUMNS}
        FROM items i
        JOIN users u ON u.id = i.owner_id
        WHERE i.status = 'approved' AND i.is_available
        ORDER BY i.created_at DESC
        LIMIT $1
        "#
    );
    sqlx::query_as::<_, ItemWithUploader>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await
}

/// Fetch a single item with uploader data, regardless of status.
pub async fn find_item_with_uploader(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<ItemWithUploader>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {ITEM_WITH_UPLOADER_COLUMNS}
        FROM items i
        JOIN users u ON u.id = i.owner_id
        WHERE i.id = $1
        "#
    );
    sqlx::query_as::<_, ItemWithUploader>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Fetch a bare item row.
pub async fn find_item_by_id(pool: &PgPool, id: Uuid) -> Result<Option<StoredItem>, sqlx::Error> {
    sqlx::query_as::<_, StoredItem>(
        r#"
        SELECT id, title, description, category, garment_type, size, condition,
               tags, images, points, owner_id, status, is_available,
               created_at, updated_at
        FROM items
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Fields accepted when creating or updating a listing.
#[derive(Debug)]
pub struct ItemFields {
    pub title: String,
    pub description: String,
    pub category: String,
    pub garment_type: String,
    pub size: String,
    pub condition: String,
    pub tags: Vec<String>,
    pub points: i64,
}

/// Insert a new listing in `pending` moderation status.
pub async fn insert_item(
    pool: &PgPool,
    id: Uuid,
    owner_id: Uuid,
    fields: &ItemFields,
    images: &[String],
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO items (
            id, title, description, category, garment_type, size, condition,
            tags, images, points, owner_id, status
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'pending')
        "#,
    )
    .bind(id)
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(&fields.category)
    .bind(&fields.garment_type)
    .bind(&fields.size)
    .bind(&fields.condition)
    .bind(&fields.tags)
    .bind(images)
    .bind(fields.points)
    .bind(owner_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Update listing fields; images are replaced only when `Some`.
pub async fn update_item(
    pool: &PgPool,
    id: Uuid,
    fields: &ItemFields,
    images: Option<&[String]>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE items SET
            title = $2,
            description = $3,
            category = $4,
            garment_type = $5,
            size = $6,
            condition = $7,
            tags = $8,
            points = $9,
            images = COALESCE($10, images),
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(&fields.category)
    .bind(&fields.garment_type)
    .bind(&fields.size)
    .bind(&fields.condition)
    .bind(&fields.tags)
    .bind(fields.points)
    .bind(images)
    .execute(pool)
    .await?;
    Ok(())
}

/// Hard delete, permitted at any moderation status.
pub async fn delete_item(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM items WHERE id = $1"#)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// A user's approved listings, newest first.
pub async fn items_by_owner(
    pool: &PgPool,
    owner_id: Uuid,
) -> Result<Vec<ItemWithUploader>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {ITEM_WITH_UPLOADER_COLUMNS}
        FROM items i
        JOIN users u ON u.id = i.owner_id
        WHERE i.owner_id = $1 AND i.status = 'approved'
        ORDER BY i.created_at DESC
        "#
    );
    sqlx::query_as::<_, ItemWithUploader>(&sql)
        .bind(owner_id)
        .fetch_all(pool)
        .await
}

/// Listings awaiting moderation, with uploader contact data.
pub async fn pending_items(pool: &PgPool) -> Result<Vec<ItemWithUploader>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {ITEM_WITH_UPLOADER_COLUMNS}
        FROM items i
        JOIN users u ON u.id = i.owner_id
        WHERE i.status = 'pending'
        ORDER BY i.created_at DESC
        "#
    );
    sqlx::query_as::<_, ItemWithUploader>(&sql).fetch_all(pool).await
}

/// Conditionally move an item out of `pending` moderation.
///
/// Returns false when the item was not pending (or missing), so the caller
/// can surface a conflict instead of silently re-moderating.
pub async fn review_item(pool: &PgPool, id: Uuid, new_status: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"UPDATE items SET status = $2, updated_at = NOW() WHERE id = $1 AND status = 'pending'"#,
    )
    .bind(id)
    .bind(new_status)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Count items in a given moderation status.
pub async fn count_items_by_status(pool: &PgPool, status: &str) -> Result<i64, sqlx::Error> {
    let result: (i64,) = sqlx::query_as(r#"SELECT COUNT(*) FROM items WHERE status = $1"#)
        .bind(status)
        .fetch_one(pool)
        .await?;
    Ok(result.0)
}

/// A recent listing creation, for the admin activity feed.
#[derive(Debug)]
pub struct RecentItem {
    pub title: String,
    pub owner_name: String,
    pub created_at: DateTime<Utc>,
}

/// Listings created within the window, newest first.
pub async fn recent_items(
    pool: &PgPool,
    since: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<RecentItem>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT i.title, u.name AS owner_name, i.created_at
        FROM items i
        JOIN users u ON u.id = i.owner_id
        WHERE i.created_at >= $1
        ORDER BY i.created_at DESC
        LIMIT $2
        "#,
    )
    .bind(since)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|r| {
            Ok(RecentItem {
                title: r.try_get("title")?,
                owner_name: r.try_get("owner_name")?,
                created_at: r.try_get("created_at")?,
            })
        })
        .collect()
}
