//! Authentication extractors.
//!
//! Bearer token extraction and validation against the configured signing
//! secret. Handlers take an [`AuthUser`] (any signed-in user) or an
//! [`AdminUser`] (admin flag required) argument to gate access.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use crate::auth::token::decode_token;
use crate::error::AppError;
use crate::AppState;

/// Authenticated user extracted from the request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let Some(header) = auth_header else {
            return Err(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ));
        };

        let Some(token) = header.strip_prefix("Bearer ") else {
            return Err(AppError::Unauthorized(
                "Invalid authorization header format".to_string(),
            ));
        };

        let claims = decode_token(&state.config.jwt_secret, token)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(AuthUser {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
            is_admin: claims.is_admin,
        })
    }
}

/// Authenticated admin; rejects with 403 when the admin flag is unset.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(AppError::Forbidden);
        }
        Ok(AdminUser(user))
    }
}
