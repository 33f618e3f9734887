//! Listing image intake.
//!
//! Multipart forms carry the listing fields as text parts and up to five
//! image parts. Images land on local disk under the configured upload
//! directory and are referenced by path string on the item record; the
//! workflow never inspects image content.

use axum::extract::Multipart;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Maximum images per listing.
pub const MAX_IMAGES: usize = 5;

/// Maximum size per image file.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Raw text fields collected from a listing form.
#[derive(Debug, Default)]
pub struct ItemForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub garment_type: Option<String>,
    pub size: Option<String>,
    pub condition: Option<String>,
    pub tags: Option<String>,
    pub points: Option<String>,
}

/// Drain a multipart request into form fields and stored image paths.
///
/// Image parts must have an `image/*` content type and fit the size cap;
/// anything else fails the whole request before the item is touched.
pub async fn read_item_form(
    mut multipart: Multipart,
    upload_dir: &str,
) -> Result<(ItemForm, Vec<String>)> {
    let mut form = ItemForm::default();
    let mut images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "images" => {
                if images.len() >= MAX_IMAGES {
                    return Err(AppError::Validation(format!(
                        "At most {MAX_IMAGES} images are allowed"
                    )));
                }

                let content_type = field.content_type().unwrap_or_default().to_string();
                if !content_type.starts_with("image/") {
                    return Err(AppError::Validation(
                        "Only image files are allowed".to_string(),
                    ));
                }

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read image: {e}")))?;
                if data.len() > MAX_IMAGE_BYTES {
                    return Err(AppError::Validation("Image exceeds 5 MB limit".to_string()));
                }

                images.push(store_image(upload_dir, &content_type, &data).await?);
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed field '{name}': {e}")))?;
                match name.as_str() {
                    "title" => form.title = Some(value),
                    "description" => form.description = Some(value),
                    "category" => form.category = Some(value),
                    "type" => form.garment_type = Some(value),
                    "size" => form.size = Some(value),
                    "condition" => form.condition = Some(value),
                    "tags" => form.tags = Some(value),
                    "points" => form.points = Some(value),
                    // Unknown fields are ignored.
                    _ => {}
                }
            }
        }
    }

    Ok((form, images))
}

/// Write one image to disk and return its public path.
async fn store_image(upload_dir: &str, content_type: &str, data: &[u8]) -> Result<String> {
    let ext = match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    };
    let file_name = format!("{}.{}", Uuid::new_v4(), ext);
    let path = std::path::Path::new(upload_dir).join(&file_name);

    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create upload dir: {e}")))?;

    let mut file = tokio::fs::File::create(&path)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to store image: {e}")))?;
    file.write_all(data)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to store image: {e}")))?;

    Ok(format!("/uploads/{file_name}"))
}
