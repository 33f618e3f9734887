//! Database operations for the users table.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

/// A stored user row from the database.
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub points: i64,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for StoredUser {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(StoredUser {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            points: row.try_get("points")?,
            is_admin: row.try_get("is_admin")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// A user row joined with its listing count, for the admin overview.
#[derive(Debug)]
pub struct UserWithItemCount {
    pub user: StoredUser,
    pub item_count: i64,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for UserWithItemCount {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(UserWithItemCount {
            user: StoredUser::from_row(row)?,
            item_count: row.try_get("item_count")?,
        })
    }
}

/// Public profile projection: approved listings and accepted swaps.
#[derive(Debug)]
pub struct PublicProfile {
    pub id: Uuid,
    pub name: String,
    pub points: i64,
    pub created_at: DateTime<Utc>,
    pub item_count: i64,
    pub completed_swaps: i64,
}

/// Insert a new user. Fails on duplicate email (unique constraint).
pub async fn insert_user(
    pool: &PgPool,
    id: Uuid,
    name: &str,
    email: &str,
    password_hash: &str,
    is_admin: bool,
) -> Result<StoredUser, sqlx::Error> {
    sqlx::query_as::<_, StoredUser>(
        r#"
        INSERT INTO users (id, name, email, password_hash, is_admin)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, email, password_hash, points, is_admin, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(is_admin)
    .fetch_one(pool)
    .await
}

/// Look up a user by (lowercased) email.
pub async fn find_user_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<StoredUser>, sqlx::Error> {
    sqlx::query_as::<_, StoredUser>(
        r#"
        SELECT id, name, email, password_hash, points, is_admin, created_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Look up a user by id.
pub async fn find_user_by_id(pool: &PgPool, id: Uuid) -> Result<Option<StoredUser>, sqlx::Error> {
    sqlx::query_as::<_, StoredUser>(
        r#"
        SELECT id, name, email, password_hash, points, is_admin, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Update a user's display name. Returns false when the user does not exist.
pub async fn update_user_name(pool: &PgPool, id: Uuid, name: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(r#"UPDATE users SET name = $2 WHERE id = $1"#)
        .bind(id)
        .bind(name)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Admin override: set a user's balance to an absolute value.
pub async fn set_user_points(pool: &PgPool, id: Uuid, points: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(r#"UPDATE users SET points = $2 WHERE id = $1"#)
        .bind(id)
        .bind(points)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Admin override: flip a user's admin flag. Returns the new value.
pub async fn toggle_user_admin(pool: &PgPool, id: Uuid) -> Result<Option<bool>, sqlx::Error> {
    let row = sqlx::query(
        r#"UPDATE users SET is_admin = NOT is_admin WHERE id = $1 RETURNING is_admin"#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(|r| r.try_get("is_admin")).transpose()
}

/// All users with their listing counts, newest first (admin overview).
pub async fn list_users_with_item_counts(
    pool: &PgPool,
) -> Result<Vec<UserWithItemCount>, sqlx::Error> {
    sqlx::query_as::<_, UserWithItemCount>(
        r#"
        SELECT u.id, u.name, u.email, u.password_hash, u.points, u.is_admin, u.created_at,
               COUNT(i.id) AS item_count
        FROM users u
        LEFT JOIN items i ON i.owner_id = u.id
        GROUP BY u.id
        ORDER BY u.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Public profile with approved-item and accepted-swap counts.
pub async fn public_profile(pool: &PgPool, id: Uuid) -> Result<Option<PublicProfile>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT u.id, u.name, u.points, u.created_at,
               (SELECT COUNT(*) FROM items i
                WHERE i.owner_id = u.id AND i.status = 'approved') AS item_count,
               (SELECT COUNT(*) FROM swaps s
                WHERE s.requester_id = u.id AND s.status = 'accepted') AS completed_swaps
        FROM users u
        WHERE u.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(|r| {
        Ok(PublicProfile {
            id: r.try_get("id")?,
            name: r.try_get("name")?,
            points: r.try_get("points")?,
            created_at: r.try_get("created_at")?,
            item_count: r.try_get("item_count")?,
            completed_swaps: r.try_get("completed_swaps")?,
        })
    })
    .transpose()
}

/// Total number of registered users.
pub async fn count_users(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let result: (i64,) = sqlx::query_as(r#"SELECT COUNT(*) FROM users"#)
        .fetch_one(pool)
        .await?;
    Ok(result.0)
}

/// Points in circulation across all balances.
pub async fn total_points(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let result: (i64,) = sqlx::query_as(r#"SELECT COALESCE(SUM(points), 0) FROM users"#)
        .fetch_one(pool)
        .await?;
    Ok(result.0)
}

/// Check if a SQL error is a unique constraint violation.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = e {
        // PostgreSQL unique violation code is "23505"
        db_err.code().map(|c| c == "23505").unwrap_or(false)
    } else {
        false
    }
}
