//! REST client implementation.
//!
//! Uses `reqwest` for HTTP and caches catalog reads with `moka`
//! (5-minute TTL). Cart and payment calls are never cached - mutable state.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use farmachelo_core::{Cart, CartItem, Price, Product, ProductId};

use super::ApiError;
use super::types::{
    AuthUser, CardValidationRequest, CardValidationResponse, CartItemRequest, ErrorBody,
    LoginRequest, LoginResponse, PaymentIntentRequest, PaymentIntentResponse, PaymentRequest,
    PaymentResponse, QuantityRequest, RegisterRequest, RemoteCart,
};
use crate::config::StorefrontConfig;
use crate::session::AuthToken;

/// Client for the Farmachelo backend API.
///
/// Cheaply cloneable; all clones share one HTTP connection pool, one product
/// cache, and one auth token slot.
#[derive(Clone)]
pub struct StorefrontApi {
    inner: Arc<StorefrontApiInner>,
}

struct StorefrontApiInner {
    client: reqwest::Client,
    root: String,
    currency: String,
    token: RwLock<Option<AuthToken>>,
    products_cache: Cache<String, Arc<Vec<Product>>>,
}

impl StorefrontApi {
    /// Create a new API client from configuration.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        let products_cache = Cache::builder()
            .max_capacity(100)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(StorefrontApiInner {
                client: reqwest::Client::new(),
                root: config.api_root(),
                currency: config.currency.clone(),
                token: RwLock::new(None),
                products_cache,
            }),
        }
    }

    /// The ISO 4217 currency code sent with payment requests.
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.inner.currency
    }

    /// Install the bearer token used for authenticated endpoints.
    pub fn set_token(&self, token: AuthToken) {
        let mut slot = self
            .inner
            .token
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = Some(token);
    }

    /// Drop the bearer token (logout).
    pub fn clear_token(&self) {
        let mut slot = self
            .inner
            .token
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = None;
    }

    /// Whether a token is currently installed.
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
            .map(AuthToken::bearer)
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

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        // Read the body as text first for better error diagnostics
        let text = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            // The backend reports validation errors in a `detail` field;
            // surface that message for inline display
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
    // Catalog Methods
    // =========================================================================

    /// Get the product catalog, optionally filtered by category or search
    /// term. Unfiltered reads are cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(
        &self,
        category: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<Product>, ApiError> {
        let filtered = category.is_some() || search.is_some();
        let cache_key = "products".to_string();

        if !filtered && let Some(products) = self.inner.products_cache.get(&cache_key).await {
            debug!("cache hit for products");
            return Ok(products.as_ref().clone());
        }

        let path = products_path(category, search);
        let products: Vec<Product> = self
            .execute(Method::GET, &path, None::<&()>, false)
            .await?;

        if !filtered {
            self.inner
                .products_cache
                .insert(cache_key, Arc::new(products.clone()))
                .await;
        }

        Ok(products)
    }

    /// Get one product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn product(&self, product_id: &ProductId) -> Result<Product, ApiError> {
        self.execute(
            Method::GET,
            &format!("/products/{product_id}"),
            None::<&()>,
            false,
        )
        .await
    }

    /// Drop cached catalog reads. The admin client runs in its own process
    /// with no handle to this cache, so the UI calls this after any admin
    /// product write (or lets the TTL expire the stale entry).
    pub async fn invalidate_products(&self) {
        self.inner.products_cache.invalidate_all();
        self.inner.products_cache.run_pending_tasks().await;
    }

    // =========================================================================
    // Cart Methods (authenticated, never cached)
    // =========================================================================

    /// Fetch the authenticated cart. The server's response is authoritative.
    ///
    /// # Errors
    ///
    /// Returns an error if unauthenticated or the request fails.
    #[instrument(skip(self))]
    pub async fn get_cart(&self) -> Result<Cart, ApiError> {
        let remote: RemoteCart = self.execute(Method::GET, "/cart", None::<&()>, true).await?;
        Ok(remote.into())
    }

    /// Upsert an item into the authenticated cart. The server increments the
    /// quantity if the product is already present.
    ///
    /// # Errors
    ///
    /// Returns an error if unauthenticated or the request fails.
    #[instrument(skip(self, item), fields(product_id = %item.product_id, quantity = item.quantity))]
    pub async fn add_cart_item(&self, item: &CartItem) -> Result<Cart, ApiError> {
        let body = CartItemRequest {
            product_id: item.product_id.as_str().to_string(),
            quantity: item.quantity,
        };
        let remote: RemoteCart = self
            .execute(Method::POST, "/cart/items", Some(&body), true)
            .await?;
        Ok(remote.into())
    }

    /// Set the quantity of a line in the authenticated cart.
    ///
    /// # Errors
    ///
    /// Returns an error if unauthenticated or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id, quantity))]
    pub async fn update_cart_item(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Cart, ApiError> {
        let body = QuantityRequest { quantity };
        let remote: RemoteCart = self
            .execute(
                Method::PUT,
                &format!("/cart/items/{product_id}"),
                Some(&body),
                true,
            )
            .await?;
        Ok(remote.into())
    }

    /// Remove a line from the authenticated cart.
    ///
    /// # Errors
    ///
    /// Returns an error if unauthenticated or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_cart_item(&self, product_id: &ProductId) -> Result<Cart, ApiError> {
        let remote: RemoteCart = self
            .execute(
                Method::DELETE,
                &format!("/cart/items/{product_id}"),
                None::<&()>,
                true,
            )
            .await?;
        Ok(remote.into())
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Log in and install the returned token on this client.
    ///
    /// # Errors
    ///
    /// Returns an error with the backend's message on invalid credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self
            .execute(Method::POST, "/auth/login", Some(&body), false)
            .await?;
        self.set_token(AuthToken::new(response.token.clone()));
        Ok(response)
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthUser, ApiError> {
        self.execute(Method::POST, "/auth/register", Some(request), false)
            .await
    }

    /// Fetch the current user for the installed token.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for a missing or rejected token.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<AuthUser, ApiError> {
        self.execute(Method::GET, "/auth/me", None::<&()>, true).await
    }

    // =========================================================================
    // Payment Methods
    // =========================================================================

    /// Ask the backend to create a payment intent for the given amount.
    ///
    /// # Errors
    ///
    /// Returns an error with the backend's `detail` message on rejection.
    #[instrument(skip(self, cart), fields(amount = amount.minor()))]
    pub async fn create_payment_intent(
        &self,
        amount: Price,
        cart: Vec<CartItem>,
    ) -> Result<PaymentIntentResponse, ApiError> {
        let body = PaymentIntentRequest {
            amount,
            currency: self.inner.currency.clone(),
            cart,
        };
        self.execute(Method::POST, "/payments/create-intent", Some(&body), true)
            .await
    }

    /// Submit a payment for processing.
    ///
    /// A rejected payment comes back as `success: false` with HTTP 200;
    /// callers must check the flag.
    ///
    /// # Errors
    ///
    /// Returns an error if unauthenticated or the request itself fails.
    #[instrument(skip(self, request), fields(amount = request.amount.minor()))]
    pub async fn process_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentResponse, ApiError> {
        self.execute(Method::POST, "/payments/process", Some(request), true)
            .await
    }

    /// Validate card details server-side.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, card_number, expiry_date, cvv))]
    pub async fn validate_card(
        &self,
        card_number: &str,
        expiry_date: &str,
        cvv: &str,
    ) -> Result<CardValidationResponse, ApiError> {
        let body = CardValidationRequest {
            card_number: card_number.to_string(),
            expiry_date: expiry_date.to_string(),
            cvv: cvv.to_string(),
        };
        self.execute(Method::POST, "/payments/validate-card", Some(&body), false)
            .await
    }
}

/// Build the catalog path, percent-encoding any filter values.
fn products_path(category: Option<&str>, search: Option<&str>) -> String {
    let mut path = "/products".to_string();
    let mut sep = '?';
    if let Some(category) = category {
        path.push_str(&format!("{sep}category={}", urlencoding::encode(category)));
        sep = '&';
    }
    if let Some(search) = search {
        path.push_str(&format!("{sep}search={}", urlencoding::encode(search)));
    }
    path
}
