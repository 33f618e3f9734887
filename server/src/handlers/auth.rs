//! Identity lifecycle: registration, login, profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{hash_password, issue_token, verify_password};
use crate::config::Config;
use crate::db;
use crate::error::{AppError, Result};

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 6;

/// Request body for registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
    pub admin_code: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response carrying a signed session token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Current user's profile, password hash omitted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub points: i64,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Validate registration input at the boundary.
fn validate_register(req: &RegisterRequest) -> Result<()> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if !req.email.contains('@') {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Register a new user and issue a session token.
///
/// Admin registration requires the approval code injected at process start;
/// without one configured, admin self-registration is disabled outright.
pub async fn handle_register(
    pool: &PgPool,
    config: &Config,
    req: RegisterRequest,
) -> Result<TokenResponse> {
    validate_register(&req)?;

    if req.is_admin {
        let Some(expected) = &config.admin_approval_code else {
            return Err(AppError::Validation(
                "Admin registration is disabled".to_string(),
            ));
        };
        let Some(code) = &req.admin_code else {
            return Err(AppError::Validation(
                "Admin approval code is required".to_string(),
            ));
        };
        if code != expected {
            return Err(AppError::Validation(
                "Invalid admin approval code".to_string(),
            ));
        }
    }

    let email = req.email.trim().to_lowercase();
    let name = req.name.trim().to_string();

    let password_hash = hash_password(&req.password)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))?;

    let user = match db::insert_user(
        pool,
        Uuid::new_v4(),
        &name,
        &email,
        &password_hash,
        req.is_admin,
    )
    .await
    {
        Ok(user) => user,
        Err(e) if db::is_unique_violation(&e) => {
            return Err(AppError::Validation("User already exists".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let token = issue_token(
        &config.jwt_secret,
        user.id,
        &user.name,
        &user.email,
        user.is_admin,
    )
    .map_err(|e| AppError::Internal(format!("Token signing failed: {e}")))?;

    Ok(TokenResponse { token })
}

/// Verify credentials and issue a session token.
///
/// Unknown email and wrong password produce the same message so the endpoint
/// does not leak which accounts exist.
pub async fn handle_login(pool: &PgPool, config: &Config, req: LoginRequest) -> Result<TokenResponse> {
    let email = req.email.trim().to_lowercase();

    let user = db::find_user_by_email(pool, &email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = issue_token(
        &config.jwt_secret,
        user.id,
        &user.name,
        &user.email,
        user.is_admin,
    )
    .map_err(|e| AppError::Internal(format!("Token signing failed: {e}")))?;

    Ok(TokenResponse { token })
}

/// Fetch the current user's profile.
pub async fn handle_profile(pool: &PgPool, user_id: Uuid) -> Result<ProfileResponse> {
    let user = db::find_user_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(ProfileResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        points: user.points,
        is_admin: user.is_admin,
        created_at: user.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            is_admin: false,
            admin_code: None,
        }
    }

    #[test]
    fn register_validation() {
        assert!(validate_register(&req("Alice", "alice@example.com", "hunter22")).is_ok());
        assert!(validate_register(&req("", "alice@example.com", "hunter22")).is_err());
        assert!(validate_register(&req("Alice", "not-an-email", "hunter22")).is_err());
        assert!(validate_register(&req("Alice", "alice@example.com", "short")).is_err());
    }

    #[test]
    fn register_request_accepts_camel_case() {
        let parsed: RegisterRequest = serde_json::from_str(
            r#"{"name":"A","email":"a@b.c","password":"secret1","isAdmin":true,"adminCode":"X"}"#,
        )
        .unwrap();
        assert!(parsed.is_admin);
        assert_eq!(parsed.admin_code.as_deref(), Some("X"));
    }
}
