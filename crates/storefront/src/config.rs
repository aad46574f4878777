//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FARMACHELO_API_BASE_URL` - Backend API origin (e.g., `http://localhost:8000`)
//!
//! ## Optional
//! - `FARMACHELO_STORAGE_DIR` - Directory for the persistent on-device store
//!   (default: `.farmachelo`)
//! - `FARMACHELO_CURRENCY` - ISO 4217 currency code (default: `COP`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Path appended to the base URL for all API requests.
const API_PREFIX: &str = "/api";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend API origin, without the `/api` suffix.
    pub base_url: Url,
    /// Directory backing the persistent on-device key-value store.
    pub storage_dir: PathBuf,
    /// ISO 4217 currency code sent with payment requests.
    pub currency: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_required_env("FARMACHELO_API_BASE_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("FARMACHELO_API_BASE_URL".to_string(), e.to_string())
            })?;
        let storage_dir = PathBuf::from(get_env_or_default("FARMACHELO_STORAGE_DIR", ".farmachelo"));
        let currency = get_env_or_default("FARMACHELO_CURRENCY", "COP");

        Ok(Self {
            base_url,
            storage_dir,
            currency,
        })
    }

    /// Build a config directly, for tests and embedding callers.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not a valid URL.
    pub fn new(base_url: &str, storage_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: base_url.parse::<Url>().map_err(|e| {
                ConfigError::InvalidEnvVar("base_url".to_string(), e.to_string())
            })?,
            storage_dir: storage_dir.into(),
            currency: "COP".to_string(),
        })
    }

    /// The API root all endpoint paths are joined onto.
    #[must_use]
    pub fn api_root(&self) -> String {
        let origin = self.base_url.as_str().trim_end_matches('/');
        format!("{origin}{API_PREFIX}")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
