//! Admin client error handling.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors from talking to the backend admin endpoints.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or transport failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status with a `detail` message.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource does not exist (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Token missing, expired, or not an admin account (401/403).
    #[error("Unauthorized: admin token missing, expired, or insufficient")]
    Unauthorized,
}

/// Application-level error type for the admin client.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Backend API operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration loading failed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The authenticated account is not an administrator.
    #[error("Account is not an administrator: {0}")]
    NotAdmin(String),
}

/// Result type alias for `AdminError`.
pub type Result<T> = std::result::Result<T, AdminError>;
