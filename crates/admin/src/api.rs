//! REST client for the backend admin endpoints.
//!
//! Everything here requires an admin bearer token except [`AdminApi::login`]
//! itself. The backend enforces the admin check server-side; [`AdminApi::verify`]
//! lets callers fail fast with a clear error before showing the back office.

use std::sync::{Arc, RwLock};

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use chrono::{DateTime, Utc};
use farmachelo_core::{
    Invoice, Order, OrderId, OrderStats, OrderStatus, Price, Product, ProductId, ProductInput,
    UserId,
};

use crate::config::AdminConfig;
use crate::error::{AdminError, ApiError};

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
struct LoginRequest {
    email: String,
    password: String,
}

/// An administrator account as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminUser {
    pub id: UserId,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct AdminSession {
    admin: AdminUser,
    token: String,
}

#[derive(Debug, Serialize)]
struct StatusUpdateRequest {
    status: OrderStatus,
}

/// The backend wraps the updated order in a confirmation envelope.
#[derive(Debug, Deserialize)]
struct StatusUpdateResponse {
    order: Order,
}

/// Billing aggregates from `/admin/invoices/stats`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct InvoiceStats {
    pub total_invoices: u64,
    pub monthly_invoices: u64,
    pub total_revenue: Price,
    pub monthly_revenue: Price,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

// =============================================================================
// Client
// =============================================================================

/// Admin API client. Cheap to clone; clones share the token slot.
#[derive(Clone)]
pub struct AdminApi {
    inner: Arc<AdminApiInner>,
}

struct AdminApiInner {
    client: reqwest::Client,
    root: String,
    token: RwLock<Option<SecretString>>,
}

impl AdminApi {
    #[must_use]
    pub fn new(config: &AdminConfig) -> Self {
        Self {
            inner: Arc::new(AdminApiInner {
                client: reqwest::Client::new(),
                root: config.api_root(),
                token: RwLock::new(None),
            }),
        }
    }

    /// Install an admin bearer token obtained out of band.
    pub fn set_token(&self, token: SecretString) {
        let mut slot = self
            .inner
            .token
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = Some(token);
    }

    /// Drop the bearer token.
    pub fn clear_token(&self) {
        let mut slot = self
            .inner
            .token
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = None;
    }

    /// Whether an admin token is installed.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.inner
            .token
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .is_some()
    }

    fn bearer(&self) -> Option<String> {
        self.inner
            .token
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .as_ref()
            .map(|t| format!("Bearer {}", t.expose_secret()))
    }

    /// Execute a request and decode the JSON response.
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&(impl Serialize + Sync)>,
        authenticated: bool,
    ) -> Result<T, ApiError> {
        let url = format!("{}{path}", self.inner.root);
        let mut request = self.inner.client.request(method, &url);

        if authenticated {
            let bearer = self.bearer().ok_or(ApiError::Unauthorized)?;
            request = request.header("Authorization", bearer);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized);
        }

        let text = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|e| e.detail)
                .unwrap_or_else(|| text.chars().take(200).collect());
            tracing::error!(%status, %message, path, "backend returned non-success status");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Authenticate against the dedicated admin login endpoint and install
    /// the returned token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for bad credentials.
    #[instrument(skip(self, password), fields(%email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminUser, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let session: AdminSession = self
            .execute(Method::POST, "/admin/login", Some(&body), false)
            .await?;
        self.set_token(SecretString::from(session.token));
        Ok(session.admin)
    }

    /// Invalidate the session server-side and drop the local token.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails; the local token is
    /// dropped regardless.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result: Result<serde_json::Value, ApiError> = self
            .execute(Method::POST, "/admin/logout", None::<&()>, true)
            .await;
        self.clear_token();
        result.map(|_| ())
    }

    /// Confirm the installed token belongs to an administrator.
    ///
    /// # Errors
    ///
    /// `AdminError::NotAdmin` for a valid but non-admin account; API
    /// errors otherwise.
    #[instrument(skip(self))]
    pub async fn verify(&self) -> Result<AdminUser, AdminError> {
        let user: AdminUser = self.execute(Method::GET, "/auth/me", None::<&()>, true).await?;
        if user.is_admin {
            Ok(user)
        } else {
            Err(AdminError::NotAdmin(user.email))
        }
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// List the full catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        self.execute(Method::GET, "/products", None::<&()>, false)
            .await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, ApiError> {
        self.execute(Method::POST, "/admin/products", Some(input), true)
            .await
    }

    /// Replace a product's fields.
    ///
    /// # Errors
    ///
    /// `ApiError::NotFound` for an unknown id; other API errors otherwise.
    #[instrument(skip(self, input), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        input: &ProductInput,
    ) -> Result<Product, ApiError> {
        self.execute(
            Method::PUT,
            &format!("/admin/products/{}", id.as_str()),
            Some(input),
            true,
        )
        .await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// `ApiError::NotFound` for an unknown id; other API errors otherwise.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .execute(
                Method::DELETE,
                &format!("/admin/products/{}", id.as_str()),
                None::<&()>,
                true,
            )
            .await?;
        Ok(())
    }

    // =========================================================================
    // Order Methods
    // =========================================================================

    /// List all orders, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn orders(
        &self,
        status: Option<OrderStatus>,
        limit: u32,
    ) -> Result<Vec<Order>, ApiError> {
        let mut path = format!("/admin/orders?limit={limit}");
        if let Some(status) = status {
            path.push_str(&format!("&status={status}"));
        }
        self.execute(Method::GET, &path, None::<&()>, true).await
    }

    /// Full details for one order, with user and product info resolved.
    ///
    /// # Errors
    ///
    /// `ApiError::NotFound` for an unknown id; other API errors otherwise.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn order(&self, id: &OrderId) -> Result<Order, ApiError> {
        self.execute(
            Method::GET,
            &format!("/admin/orders/{}", id.as_str()),
            None::<&()>,
            true,
        )
        .await
    }

    /// Order counts per status plus revenue aggregates.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn order_stats(&self) -> Result<OrderStats, ApiError> {
        self.execute(Method::GET, "/admin/orders/stats", None::<&()>, true)
            .await
    }

    /// Set an order's status. Any status may be set from any other; this
    /// is a manual back-office override, not a workflow transition.
    ///
    /// # Errors
    ///
    /// `ApiError::NotFound` for an unknown id; other API errors otherwise.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        let body = StatusUpdateRequest { status };
        let response: StatusUpdateResponse = self
            .execute(
                Method::PUT,
                &format!("/admin/orders/{}/status", id.as_str()),
                Some(&body),
                true,
            )
            .await?;
        Ok(response.order)
    }

    // =========================================================================
    // Invoice Methods
    // =========================================================================

    /// List all invoices, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn invoices(&self) -> Result<Vec<Invoice>, ApiError> {
        self.execute(Method::GET, "/admin/invoices", None::<&()>, true)
            .await
    }

    /// Billing aggregates: invoice counts and revenue, total and current
    /// month.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn invoice_stats(&self) -> Result<InvoiceStats, ApiError> {
        self.execute(Method::GET, "/admin/invoices/stats", None::<&()>, true)
            .await
    }
}
