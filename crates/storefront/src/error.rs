//! Unified error handling.
//!
//! Provides a unified `AppError` type wrapping the per-concern errors. The
//! cart and invoice mechanisms deliberately swallow most failures (log and
//! degrade); `AppError` covers the operations where the caller must react,
//! such as checkout and explicit API calls.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// On-device storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration loading failed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Payment was rejected or not confirmed by the provider.
    #[error("Payment failed: {0}")]
    PaymentFailed(String),

    /// Client-side form validation failed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// User is not authenticated for an operation that requires it.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl AppError {
    /// The generic message shown to the user for connectivity failures.
    ///
    /// Network errors are never exposed in detail; the UI shows a single
    /// "connection error" notification and the user retries manually.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ApiError::Http(_)) => {
                "Error de conexión con el servidor. Por favor, intenta nuevamente.".to_string()
            }
            Self::Api(ApiError::Api { message, .. }) => message.clone(),
            Self::PaymentFailed(msg) | Self::Validation(msg) => msg.clone(),
            Self::Unauthorized(_) => "Inicia sesión para continuar.".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
