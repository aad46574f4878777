//! Checkout: card validation and the payment flow.
//!
//! Card checks run client-side first so obviously bad input never reaches
//! the backend, then the backend re-validates during processing. A rejected
//! payment comes back as a normal response with `success = false`, not as a
//! transport error.

use chrono::{DateTime, Datelike, Utc};
use tracing::instrument;

use farmachelo_core::{Cart, CardType, CustomerInfo, Email, Invoice};

use crate::api::{PaymentCard, PaymentRequest, PaymentResponse, StorefrontApi};
use crate::cart::SessionCart;
use crate::error::{AppError, Result};
use crate::invoice::{InvoicePipeline, generate_invoice};

/// Accepted PAN lengths after normalization.
const CARD_NUMBER_MIN: usize = 13;
const CARD_NUMBER_MAX: usize = 19;

// =============================================================================
// Card Input Helpers
// =============================================================================

/// Strip everything but digits from a card number.
#[must_use]
pub fn normalize_card_number(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Format a card number for display: digits in groups of four, capped at 16.
#[must_use]
pub fn format_card_number(input: &str) -> String {
    let digits: String = normalize_card_number(input).chars().take(16).collect();
    let mut out = String::with_capacity(digits.len() + 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// Format an expiry as it is typed: `MMYY` digits become `MM/YY`.
#[must_use]
pub fn format_expiry(input: &str) -> String {
    let digits: String = input
        .chars()
        .filter(char::is_ascii_digit)
        .take(4)
        .collect();
    if digits.len() > 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}

/// Luhn checksum over an already-normalized digit string.
#[must_use]
pub fn luhn_valid(digits: &str) -> bool {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let mut sum: u32 = 0;
    for (i, c) in digits.chars().rev().enumerate() {
        let mut d = c.to_digit(10).unwrap_or(0);
        if i % 2 == 1 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
    }
    sum % 10 == 0
}

/// Detect the card network from the leading digits of a normalized PAN.
#[must_use]
pub fn detect_card_type(digits: &str) -> CardType {
    if digits.starts_with('4') {
        return CardType::Visa;
    }
    if matches!(digits.get(..2), Some("51" | "52" | "53" | "54" | "55")) {
        return CardType::Mastercard;
    }
    if matches!(digits.get(..2), Some("34" | "37")) {
        return CardType::Amex;
    }
    if matches!(
        digits.get(..3),
        Some("300" | "301" | "302" | "303" | "304" | "305")
    ) || matches!(digits.get(..2), Some("36" | "38"))
    {
        return CardType::Diners;
    }
    if digits.starts_with("6011") || digits.starts_with("65") {
        return CardType::Discover;
    }
    CardType::Unknown
}

// =============================================================================
// Card Details
// =============================================================================

/// Card details as entered at checkout, pre-validation.
#[derive(Debug, Clone)]
pub struct CardDetails {
    pub card_number: String,
    /// `MM/YY`.
    pub expiry_date: String,
    pub cvv: String,
    pub cardholder_name: String,
    pub country: String,
}

impl CardDetails {
    /// Run all client-side checks.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` with a user-facing Spanish message on
    /// the first failing check.
    pub fn validate(&self) -> Result<()> {
        if self.cardholder_name.trim().is_empty() {
            return Err(AppError::Validation(
                "Por favor completa todos los campos".to_string(),
            ));
        }

        let digits = normalize_card_number(&self.card_number);
        if digits.len() < CARD_NUMBER_MIN || digits.len() > CARD_NUMBER_MAX {
            return Err(AppError::Validation(
                "Número de tarjeta inválido".to_string(),
            ));
        }
        if !luhn_valid(&digits) {
            return Err(AppError::Validation(
                "Número de tarjeta inválido".to_string(),
            ));
        }

        validate_expiry(&self.expiry_date)?;

        if self.cvv.len() < 3
            || self.cvv.len() > 4
            || !self.cvv.chars().all(|c| c.is_ascii_digit())
        {
            return Err(AppError::Validation("CVV inválido".to_string()));
        }

        Ok(())
    }

    /// The card network for the entered number.
    #[must_use]
    pub fn card_type(&self) -> CardType {
        detect_card_type(&normalize_card_number(&self.card_number))
    }

    fn to_payment_card(&self) -> PaymentCard {
        PaymentCard {
            card_number: normalize_card_number(&self.card_number),
            expiry_date: self.expiry_date.clone(),
            cvv: self.cvv.clone(),
            cardholder_name: self.cardholder_name.trim().to_string(),
            country: self.country.clone(),
        }
    }
}

/// Check `MM/YY` shape and that the expiry is not in the past.
fn validate_expiry(expiry: &str) -> Result<()> {
    validate_expiry_at(expiry, Utc::now())
}

/// The cutoff is the first day of the expiry month: a card expiring this
/// month is already rejected, matching the payment backend.
fn validate_expiry_at(expiry: &str, now: DateTime<Utc>) -> Result<()> {
    let invalid = || AppError::Validation("Fecha de vencimiento inválida".to_string());

    let (month_s, year_s) = expiry.split_once('/').ok_or_else(invalid)?;
    if month_s.len() != 2 || year_s.len() != 2 {
        return Err(invalid());
    }
    let month: u32 = month_s.parse().map_err(|_| invalid())?;
    let year: i32 = year_s.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }

    let full_year = 2000 + year;
    if full_year < now.year() || (full_year == now.year() && month <= now.month()) {
        return Err(AppError::Validation("La tarjeta ha expirado".to_string()));
    }
    Ok(())
}

// =============================================================================
// Payment Flow
// =============================================================================

/// Validate, open a payment intent and process the charge.
///
/// Returns the provider's response on a confirmed charge. A rejected charge
/// (HTTP success with `success = false`) maps to `AppError::PaymentFailed`
/// so callers never have to inspect the flag themselves.
///
/// # Errors
///
/// `AppError::Validation` for bad input, `AppError::Api` for transport or
/// backend failures, `AppError::PaymentFailed` for a declined charge.
#[instrument(skip_all, fields(items = cart.items.len(), total = %cart.total))]
pub async fn pay(
    api: &StorefrontApi,
    cart: &Cart,
    email: &str,
    card: &CardDetails,
) -> Result<PaymentResponse> {
    if cart.is_empty() {
        return Err(AppError::Validation("El carrito está vacío".to_string()));
    }
    Email::parse(email)
        .map_err(|_| AppError::Validation("Correo electrónico inválido".to_string()))?;
    card.validate()?;

    let subtotal = cart.compute_total();
    let total = subtotal.plus(subtotal.tax());

    let intent = api.create_payment_intent(total, cart.items.clone()).await?;
    tracing::debug!(client_secret = %intent.client_secret, "payment intent created");

    let request = PaymentRequest {
        email: email.to_string(),
        card: card.to_payment_card(),
        amount: total,
        currency: api.currency().to_string(),
    };
    let response = api.process_payment(&request).await?;

    if response.success {
        tracing::info!(
            transaction_id = response.transaction_id.as_deref().unwrap_or("-"),
            "payment confirmed"
        );
        Ok(response)
    } else {
        let reason = response
            .error
            .unwrap_or_else(|| "Pago rechazado".to_string());
        tracing::warn!(%reason, "payment rejected");
        Err(AppError::PaymentFailed(reason))
    }
}

/// The whole checkout in one call: charge the card, build the invoice,
/// persist it to every tier, and empty the cart.
///
/// On any failure nothing is persisted and the cart is untouched, so a
/// retry starts from the same state.
///
/// # Errors
///
/// Propagates everything [`pay`] can return.
#[instrument(skip_all, fields(customer = %customer.email))]
pub async fn complete_checkout(
    api: &StorefrontApi,
    pipeline: &InvoicePipeline,
    session: &SessionCart,
    customer: CustomerInfo,
    card: &CardDetails,
) -> Result<Invoice> {
    let cart = session.cart().await;
    let response = pay(api, &cart, &customer.email, card).await?;
    let invoice = generate_invoice(&response, &cart, customer)?;
    pipeline.persist(&invoice);
    session.clear().await;
    Ok(invoice)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // Standard test PANs
    const VISA: &str = "4111111111111111";
    const MASTERCARD: &str = "5500005555555559";
    const AMEX: &str = "378282246310005";

    fn card(number: &str, expiry: &str, cvv: &str) -> CardDetails {
        CardDetails {
            card_number: number.to_string(),
            expiry_date: expiry.to_string(),
            cvv: cvv.to_string(),
            cardholder_name: "Juan Pérez".to_string(),
            country: "CO".to_string(),
        }
    }

    #[test]
    fn test_luhn() {
        assert!(luhn_valid(VISA));
        assert!(luhn_valid(MASTERCARD));
        assert!(luhn_valid(AMEX));
        assert!(!luhn_valid("4111111111111112"));
        assert!(!luhn_valid(""));
        assert!(!luhn_valid("4111 1111"));
    }

    #[test]
    fn test_detect_card_type() {
        assert_eq!(detect_card_type(VISA), CardType::Visa);
        assert_eq!(detect_card_type(MASTERCARD), CardType::Mastercard);
        assert_eq!(detect_card_type(AMEX), CardType::Amex);
        assert_eq!(detect_card_type("30569309025904"), CardType::Diners);
        assert_eq!(detect_card_type("36227206271667"), CardType::Diners);
        assert_eq!(detect_card_type("6011111111111117"), CardType::Discover);
        assert_eq!(detect_card_type("6511111111111111"), CardType::Discover);
        assert_eq!(detect_card_type("9999999999999999"), CardType::Unknown);
    }

    #[test]
    fn test_format_card_number_groups_of_four() {
        assert_eq!(format_card_number("4111111111111111"), "4111 1111 1111 1111");
        assert_eq!(format_card_number("4111-1111-1111-1111"), "4111 1111 1111 1111");
        assert_eq!(format_card_number("41111"), "4111 1");
        // Capped at 16 digits
        assert_eq!(
            format_card_number("41111111111111112222"),
            "4111 1111 1111 1111"
        );
    }

    #[test]
    fn test_format_expiry() {
        assert_eq!(format_expiry("1"), "1");
        assert_eq!(format_expiry("12"), "12");
        assert_eq!(format_expiry("123"), "12/3");
        assert_eq!(format_expiry("1227"), "12/27");
        assert_eq!(format_expiry("12/27"), "12/27");
    }

    #[test]
    fn test_validate_accepts_good_card() {
        assert!(card(VISA, "12/99", "123").validate().is_ok());
        // Amex takes a 4-digit CVV
        assert!(card(AMEX, "12/99", "1234").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_luhn() {
        let err = card("4111111111111112", "12/99", "123")
            .validate()
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.user_message(), "Número de tarjeta inválido");
    }

    #[test]
    fn test_validate_rejects_expired_card() {
        let err = card(VISA, "01/20", "123").validate().unwrap_err();
        assert_eq!(err.user_message(), "La tarjeta ha expirado");
    }

    #[test]
    fn test_expiry_cutoff_is_first_of_month() {
        use chrono::TimeZone;

        let now = Utc.with_ymd_and_hms(2026, 8, 28, 12, 0, 0).unwrap();
        // A card expiring this month is already rejected
        let err = validate_expiry_at("08/26", now).unwrap_err();
        assert_eq!(err.user_message(), "La tarjeta ha expirado");
        // Next month is the first accepted expiry
        assert!(validate_expiry_at("09/26", now).is_ok());
        // December rolls over into the next year
        let december = Utc.with_ymd_and_hms(2026, 12, 5, 0, 0, 0).unwrap();
        let err = validate_expiry_at("12/26", december).unwrap_err();
        assert_eq!(err.user_message(), "La tarjeta ha expirado");
        assert!(validate_expiry_at("01/27", december).is_ok());
    }

    #[test]
    fn test_validate_rejects_malformed_expiry() {
        for expiry in ["1299", "13/99", "00/99", "1/99", "12/999"] {
            let err = card(VISA, expiry, "123").validate().unwrap_err();
            assert_eq!(err.user_message(), "Fecha de vencimiento inválida");
        }
    }

    #[test]
    fn test_validate_rejects_bad_cvv() {
        for cvv in ["12", "12345", "12a"] {
            let err = card(VISA, "12/99", cvv).validate().unwrap_err();
            assert_eq!(err.user_message(), "CVV inválido");
        }
    }

    #[tokio::test]
    async fn test_pay_rejects_invalid_email_before_charging() {
        use farmachelo_core::{CartItem, Price, ProductId};

        let mut cart = Cart::empty();
        cart.upsert(CartItem {
            product_id: ProductId::new("p1"),
            name: "Paracetamol 500mg".to_string(),
            price: Price::from_minor(15_000),
            quantity: 1,
            requires_prescription: false,
            image_url: None,
        });
        let config = crate::config::StorefrontConfig::new("http://localhost:8000", "/tmp/x")
            .unwrap();
        let api = crate::api::StorefrontApi::new(&config);

        let err = pay(&api, &cart, "no-arroba", &card(VISA, "12/99", "123"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Correo electrónico inválido");
    }

    #[tokio::test]
    async fn test_complete_checkout_rejects_empty_cart_before_charging() {
        use std::sync::Arc;

        use crate::cart::{CartManager, LocalCartStore, SessionCart};
        use crate::invoice::InvoicePipeline;
        use crate::storage::{MemoryStore, SharedStore};

        let store: SharedStore = Arc::new(MemoryStore::new());
        let session =
            SessionCart::Anonymous(CartManager::new(LocalCartStore::new(store.clone())).await);
        let pipeline = InvoicePipeline::new(store, Arc::new(MemoryStore::new()));
        let config = crate::config::StorefrontConfig::new("http://localhost:8000", "/tmp/x")
            .unwrap();
        let api = crate::api::StorefrontApi::new(&config);

        let customer = CustomerInfo {
            name: "Juan Pérez".to_string(),
            email: "juan@example.com".to_string(),
            phone: String::new(),
            address: String::new(),
        };
        let err = complete_checkout(&api, &pipeline, &session, customer, &card(VISA, "12/99", "123"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "El carrito está vacío");
        // Nothing was persisted
        assert!(pipeline.resolve().is_demo());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let mut c = card(VISA, "12/99", "123");
        c.cardholder_name = "   ".to_string();
        assert!(c.validate().is_err());
    }
}
