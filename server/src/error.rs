//! Unified error handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Domain(#[from] rewear_core::Error),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Not authorized")]
    Forbidden,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

/// Map a domain error to its HTTP status.
fn domain_status(e: &rewear_core::Error) -> StatusCode {
    use rewear_core::Error;
    match e {
        Error::ItemNotAvailable => StatusCode::NOT_FOUND,
        Error::OwnItemRequest
        | Error::InsufficientPoints
        | Error::InvalidPointsOffer
        | Error::NegativePoints => StatusCode::BAD_REQUEST,
        Error::AlreadyProcessed | Error::NotPendingModeration => StatusCode::CONFLICT,
        Error::BalanceOverflow => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                    None,
                )
            }
            AppError::Domain(e) => {
                tracing::warn!("Domain error: {}", e);
                (domain_status(e), e.to_string(), None)
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Not authorized".to_string(), None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    Some(msg.clone()),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
            details,
        });

        (status, body).into_response()
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_http_statuses() {
        assert_eq!(
            domain_status(&rewear_core::Error::ItemNotAvailable),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            domain_status(&rewear_core::Error::OwnItemRequest),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            domain_status(&rewear_core::Error::InsufficientPoints),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            domain_status(&rewear_core::Error::InvalidPointsOffer),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            domain_status(&rewear_core::Error::AlreadyProcessed),
            StatusCode::CONFLICT
        );
        assert_eq!(
            domain_status(&rewear_core::Error::NotPendingModeration),
            StatusCode::CONFLICT
        );
    }
}
