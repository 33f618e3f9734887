//! Listing CRUD and public queries.

use chrono::{DateTime, Utc};
use rewear_core::{Category, Condition, GarmentType};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{self, ItemFields, ItemWithUploader, ListingFilter};
use crate::error::{AppError, Result};
use crate::storage::ItemForm;

/// Featured listing cap.
const FEATURED_LIMIT: i64 = 6;

/// Query parameters for the public listing endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub garment_type: Option<String>,
    pub search: Option<String>,
}

/// A listing joined with uploader display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub garment_type: String,
    pub size: String,
    pub condition: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub points: i64,
    pub status: String,
    pub is_available: bool,
    pub uploader_id: Uuid,
    pub uploader_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ItemWithUploader> for ItemResponse {
    fn from(row: ItemWithUploader) -> Self {
        let item = row.item;
        ItemResponse {
            id: item.id,
            title: item.title,
            description: item.description,
            category: item.category,
            garment_type: item.garment_type,
            size: item.size,
            condition: item.condition,
            tags: item.tags,
            images: item.images,
            points: item.points,
            status: item.status,
            is_available: item.is_available,
            uploader_id: item.owner_id,
            uploader_name: row.uploader_name,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

/// Response for create/update/delete acknowledgements.
#[derive(Debug, Serialize)]
pub struct ItemMutationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub message: String,
}

/// Validate raw form fields into canonical storage fields.
///
/// Enum-valued fields must parse against the domain's wire names; tags
/// arrive as one comma-separated string.
fn validate_item_form(form: &ItemForm) -> Result<ItemFields> {
    let title = form
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("Title is required".to_string()))?;

    let description = form
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::Validation("Description is required".to_string()))?;

    let category = form
        .category
        .as_deref()
        .and_then(Category::parse)
        .ok_or_else(|| AppError::Validation("Invalid category".to_string()))?;

    let garment_type = form
        .garment_type
        .as_deref()
        .and_then(GarmentType::parse)
        .ok_or_else(|| AppError::Validation("Invalid type".to_string()))?;

    let condition = form
        .condition
        .as_deref()
        .and_then(Condition::parse)
        .ok_or_else(|| AppError::Validation("Invalid condition".to_string()))?;

    let points = match form.points.as_deref() {
        None | Some("") => 0,
        Some(raw) => raw
            .parse::<i64>()
            .ok()
            .filter(|p| *p >= 0)
            .ok_or_else(|| AppError::Validation("Invalid points value".to_string()))?,
    };

    let tags = form
        .tags
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    Ok(ItemFields {
        title: title.to_string(),
        description: description.to_string(),
        category: category.as_str().to_string(),
        garment_type: garment_type.as_str().to_string(),
        size: form.size.as_deref().unwrap_or_default().trim().to_string(),
        condition: condition.as_str().to_string(),
        tags,
        points,
    })
}

/// Public listings, filtered.
pub async fn handle_list_items(pool: &PgPool, query: ListingQuery) -> Result<Vec<ItemResponse>> {
    let filter = ListingFilter {
        category: query.category.filter(|c| !c.is_empty()),
        garment_type: query.garment_type.filter(|t| !t.is_empty()),
        search: query.search.filter(|s| !s.is_empty()),
    };
    let rows = db::list_public_items(pool, &filter).await?;
    Ok(rows.into_iter().map(ItemResponse::from).collect())
}

/// Featured listings: newest approved-and-available, capped.
pub async fn handle_featured_items(pool: &PgPool) -> Result<Vec<ItemResponse>> {
    let rows = db::featured_items(pool, FEATURED_LIMIT).await?;
    Ok(rows.into_iter().map(ItemResponse::from).collect())
}

/// Single listing detail, any moderation status.
pub async fn handle_get_item(pool: &PgPool, id: Uuid) -> Result<ItemResponse> {
    let row = db::find_item_with_uploader(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;
    Ok(row.into())
}

/// Create a listing. New listings enter `pending` moderation.
pub async fn handle_create_item(
    pool: &PgPool,
    owner_id: Uuid,
    form: ItemForm,
    images: Vec<String>,
) -> Result<ItemMutationResponse> {
    let fields = validate_item_form(&form)?;
    let id = Uuid::new_v4();
    db::insert_item(pool, id, owner_id, &fields, &images).await?;
    Ok(ItemMutationResponse {
        id: Some(id),
        message: "Item created successfully".to_string(),
    })
}

/// Update a listing the caller owns. Images are replaced only when new ones
/// were uploaded.
pub async fn handle_update_item(
    pool: &PgPool,
    caller_id: Uuid,
    item_id: Uuid,
    form: ItemForm,
    images: Vec<String>,
) -> Result<ItemMutationResponse> {
    let item = db::find_item_by_id(pool, item_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;
    if item.owner_id != caller_id {
        return Err(AppError::Forbidden);
    }

    let fields = validate_item_form(&form)?;
    let images = if images.is_empty() {
        None
    } else {
        Some(images)
    };
    db::update_item(pool, item_id, &fields, images.as_deref()).await?;

    Ok(ItemMutationResponse {
        id: None,
        message: "Item updated successfully".to_string(),
    })
}

/// Delete a listing the caller owns.
pub async fn handle_delete_item(
    pool: &PgPool,
    caller_id: Uuid,
    item_id: Uuid,
) -> Result<ItemMutationResponse> {
    let item = db::find_item_by_id(pool, item_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;
    if item.owner_id != caller_id {
        return Err(AppError::Forbidden);
    }

    db::delete_item(pool, item_id).await?;
    Ok(ItemMutationResponse {
        id: None,
        message: "Item deleted successfully".to_string(),
    })
}

/// A user's approved listings.
pub async fn handle_user_items(pool: &PgPool, user_id: Uuid) -> Result<Vec<ItemResponse>> {
    let rows = db::items_by_owner(pool, user_id).await?;
    Ok(rows.into_iter().map(ItemResponse::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ItemForm {
        ItemForm {
            title: Some("Wool coat".to_string()),
            description: Some("Warm winter coat".to_string()),
            category: Some("Outerwear".to_string()),
            garment_type: Some("Vintage".to_string()),
            size: Some("M".to_string()),
            condition: Some("like-new".to_string()),
            tags: Some("wool, winter ,coat".to_string()),
            points: Some("40".to_string()),
        }
    }

    #[test]
    fn form_validates_and_canonicalizes() {
        let fields = validate_item_form(&form()).unwrap();
        assert_eq!(fields.category, "Outerwear");
        assert_eq!(fields.condition, "like-new");
        assert_eq!(fields.tags, vec!["wool", "winter", "coat"]);
        assert_eq!(fields.points, 40);
    }

    #[test]
    fn form_rejects_bad_enums_and_points() {
        let mut bad = form();
        bad.category = Some("Hats".to_string());
        assert!(validate_item_form(&bad).is_err());

        let mut bad = form();
        bad.condition = Some("mint".to_string());
        assert!(validate_item_form(&bad).is_err());

        let mut bad = form();
        bad.points = Some("-5".to_string());
        assert!(validate_item_form(&bad).is_err());

        let mut bad = form();
        bad.title = Some("   ".to_string());
        assert!(validate_item_form(&bad).is_err());
    }

    #[test]
    fn missing_points_defaults_to_zero() {
        let mut f = form();
        f.points = None;
        assert_eq!(validate_item_form(&f).unwrap().points, 0);
    }
}
