//! Configuration management for the server.

use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// PostgreSQL connection URL
    pub database_url: String,
    /// Secret key for signing session tokens
    pub jwt_secret: String,
    /// Approval code required to register an admin account.
    /// Injected at process start; absent means admin self-registration is
    /// disabled.
    pub admin_approval_code: Option<String>,
    /// Directory where uploaded listing images are stored
    pub upload_dir: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::MissingJwtSecret)?;

        let admin_approval_code = env::var("ADMIN_APPROVAL_CODE").ok();

        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());

        Ok(Self {
            host,
            port,
            database_url,
            jwt_secret,
            admin_approval_code,
            upload_dir,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DATABASE_URL environment variable is required")]
    MissingDatabaseUrl,

    #[error("JWT_SECRET environment variable is required")]
    MissingJwtSecret,

    #[error("Invalid PORT value")]
    InvalidPort,
}
