//! Signed session tokens.
//!
//! HS256 JWTs carrying the user's identity and admin flag, valid for 24
//! hours. The signing secret comes from configuration.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token lifetime.
const TOKEN_TTL_HOURS: i64 = 24;

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    /// Expiry, seconds since epoch
    pub exp: i64,
}

/// Issue a signed session token for a user.
pub fn issue_token(
    secret: &str,
    user_id: Uuid,
    name: &str,
    email: &str,
    is_admin: bool,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: user_id,
        name: name.to_string(),
        email: email.to_string(),
        is_admin,
        exp: (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Validate a token and return its claims.
pub fn decode_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let id = Uuid::new_v4();
        let token = issue_token("secret", id, "Alice", "alice@example.com", false).unwrap();
        let claims = decode_token("secret", &token).unwrap();

        assert_eq!(claims.sub, id);
        assert_eq!(claims.email, "alice@example.com");
        assert!(!claims.is_admin);
    }

    #[test]
    fn wrong_secret_rejected() {
        let token =
            issue_token("secret", Uuid::new_v4(), "Alice", "alice@example.com", true).unwrap();
        assert!(decode_token("other", &token).is_err());
    }
}
