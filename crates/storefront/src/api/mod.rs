//! Backend REST API client.
//!
//! # Architecture
//!
//! - Plain REST/JSON over `reqwest` against `<base_url>/api`
//! - Bearer-token authentication; the token is optional and its absence
//!   degrades cart operations to local-only mode rather than erroring
//! - The backend is the source of truth for authenticated state - every
//!   cart response replaces local in-memory state verbatim
//! - Product catalog reads are cached in-memory via `moka` (5 minute TTL)
//!
//! # Example
//!
//! ```rust,ignore
//! use farmachelo_storefront::api::StorefrontApi;
//!
//! let api = StorefrontApi::new(&config)?;
//!
//! // Browse the catalog
//! let products = api.products(None, Some("paracetamol")).await?;
//!
//! // Authenticated cart
//! api.set_token(AuthToken::new(token));
//! let cart = api.add_cart_item(&products[0].to_cart_item(1)).await?;
//! ```

mod client;
mod types;

pub use client::StorefrontApi;
pub use types::{
    AuthUser, CardValidationResponse, LoginResponse, PaymentCard, PaymentIntentResponse,
    PaymentRequest, PaymentResponse, RegisterRequest, RemoteCart,
};

use thiserror::Error;

/// Errors that can occur when talking to the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connectivity, DNS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Token missing, expired, or rejected.
    #[error("Unauthorized")]
    Unauthorized,

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

impl ApiError {
    /// Whether this failure means the auth token is unusable and the cart
    /// should degrade to local-only mode.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("product p-1".to_string());
        assert_eq!(err.to_string(), "Not found: product p-1");

        let err = ApiError::Api {
            status: 422,
            message: "Credenciales inválidas".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 422 - Credenciales inválidas");
    }

    #[test]
    fn test_rate_limited_display() {
        let err = ApiError::RateLimited(30);
        assert_eq!(err.to_string(), "Rate limited, retry after 30 seconds");
    }

    #[test]
    fn test_auth_failure_classification() {
        assert!(ApiError::Unauthorized.is_auth_failure());
        assert!(!ApiError::NotFound("x".to_string()).is_auth_failure());
    }
}
