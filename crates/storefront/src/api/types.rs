//! Wire types for the backend API.
//!
//! Field names follow the backend's JSON exactly; the payment form fields
//! use camelCase because that is what the payment endpoints expect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use farmachelo_core::{Cart, CartItem, Price, UserId};

// =============================================================================
// Auth
// =============================================================================

/// `POST /auth/login` request body.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /auth/register` request body.
#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Authenticated user as `GET /auth/me` returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// `POST /auth/login` response body.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: AuthUser,
}

// =============================================================================
// Cart
// =============================================================================

/// The authenticated cart as the backend returns it, enriched with product
/// details per line.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteCart {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub total: Price,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl From<RemoteCart> for Cart {
    fn from(remote: RemoteCart) -> Self {
        let mut cart = Self {
            owner_id: remote.user_id,
            items: remote.items,
            total: remote.total,
            updated_at: remote.updated_at,
        };
        // The server total is authoritative when present, but a missing or
        // stale one must never disagree with the items.
        cart.total = cart.compute_total();
        cart
    }
}

/// `POST /cart/items` request body.
#[derive(Debug, Serialize)]
pub struct CartItemRequest {
    pub product_id: String,
    pub quantity: u32,
}

/// `PUT /cart/items/:id` request body.
#[derive(Debug, Serialize)]
pub struct QuantityRequest {
    pub quantity: u32,
}

// =============================================================================
// Payments
// =============================================================================

/// Card details from the payment form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCard {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub cardholder_name: String,
    pub country: String,
}

/// `POST /payments/process` request body.
#[derive(Debug, Serialize)]
pub struct PaymentRequest {
    pub email: String,
    pub card: PaymentCard,
    /// Amount in minor units; must equal the cart total server-side.
    pub amount: Price,
    pub currency: String,
}

/// `POST /payments/process` response body.
///
/// The backend signals rejection with `success: false` and HTTP 200, so
/// callers must check the flag, not just the status code.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub success: bool,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub invoice_id: Option<String>,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `POST /payments/create-intent` request body.
#[derive(Debug, Serialize)]
pub struct PaymentIntentRequest {
    pub amount: Price,
    pub currency: String,
    pub cart: Vec<CartItem>,
}

/// `POST /payments/create-intent` response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

/// `POST /payments/validate-card` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardValidationRequest {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
}

/// `POST /payments/validate-card` response body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardValidationResponse {
    pub valid: bool,
    #[serde(default)]
    pub card_type: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Error envelope the backend uses for non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_cart_recomputes_stale_total() {
        let json = r#"{
            "id": "c-1",
            "user_id": "u-1",
            "items": [
                {"product_id": "p1", "name": "Paracetamol 500mg", "price": 15000, "quantity": 2}
            ],
            "total": 0,
            "updated_at": "2026-08-01T12:00:00Z"
        }"#;
        let cart: Cart = serde_json::from_str::<RemoteCart>(json).unwrap().into();
        assert_eq!(cart.total, Price::from_minor(30_000));
        assert_eq!(cart.owner_id.as_ref().map(UserId::as_str), Some("u-1"));
    }

    #[test]
    fn test_payment_card_serializes_camel_case() {
        let card = PaymentCard {
            card_number: "4111111111111111".to_string(),
            expiry_date: "12/30".to_string(),
            cvv: "123".to_string(),
            cardholder_name: "Cliente Demo".to_string(),
            country: "CO".to_string(),
        };
        let json = serde_json::to_value(&card).unwrap();
        assert!(json.get("cardNumber").is_some());
        assert!(json.get("cardholderName").is_some());
        assert!(json.get("card_number").is_none());
    }

    #[test]
    fn test_payment_response_failure_shape() {
        let resp: PaymentResponse = serde_json::from_str(
            r#"{"success": false, "error": "Tarjeta rechazada por el banco emisor"}"#,
        )
        .unwrap();
        assert!(!resp.success);
        assert!(resp.transaction_id.is_none());
        assert_eq!(resp.error.as_deref(), Some("Tarjeta rechazada por el banco emisor"));
    }
}
