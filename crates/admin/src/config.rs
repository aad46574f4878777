//! Admin client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FARMACHELO_API_BASE_URL` - Backend API origin (e.g., `http://localhost:8000`)

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

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Backend API origin, without the `/api` suffix.
    pub base_url: Url,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let raw = std::env::var("FARMACHELO_API_BASE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("FARMACHELO_API_BASE_URL".to_string()))?;
        Self::new(&raw)
    }

    /// Build a config directly, for tests and embedding callers.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not a valid URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: base_url.parse::<Url>().map_err(|e| {
                ConfigError::InvalidEnvVar("FARMACHELO_API_BASE_URL".to_string(), e.to_string())
            })?,
        })
    }

    /// The API root all endpoint paths are joined onto.
    #[must_use]
    pub fn api_root(&self) -> String {
        let origin = self.base_url.as_str().trim_end_matches('/');
        format!("{origin}{API_PREFIX}")
    }
}
