//! Checkout validation rules, mirrored against the backend's own checks.

#![allow(clippy::unwrap_used)]

use farmachelo_core::{CardType, Price};
use farmachelo_storefront::checkout::{
    CardDetails, detect_card_type, format_card_number, format_expiry, luhn_valid,
};
use farmachelo_storefront::error::AppError;

fn card(number: &str, expiry: &str, cvv: &str) -> CardDetails {
    CardDetails {
        card_number: number.to_string(),
        expiry_date: expiry.to_string(),
        cvv: cvv.to_string(),
        cardholder_name: "Juan Pérez".to_string(),
        country: "CO".to_string(),
    }
}

// =============================================================================
// Card Number Rules
// =============================================================================

#[test]
fn test_luhn_accepts_standard_test_numbers() {
    for number in [
        "4111111111111111",  // Visa
        "5500005555555559",  // Mastercard
        "378282246310005",   // Amex
        "30569309025904",    // Diners Club
        "6011111111111117",  // Discover
    ] {
        assert!(luhn_valid(number), "expected {number} to pass Luhn");
    }
}

#[test]
fn test_network_detection_matches_backend_prefixes() {
    assert_eq!(detect_card_type("4111111111111111"), CardType::Visa);
    assert_eq!(detect_card_type("5111111111111118"), CardType::Mastercard);
    assert_eq!(detect_card_type("5511111111111116"), CardType::Mastercard);
    assert_eq!(detect_card_type("341111111111111"), CardType::Amex);
    assert_eq!(detect_card_type("371111111111114"), CardType::Amex);
    assert_eq!(detect_card_type("30011111111111"), CardType::Diners);
    assert_eq!(detect_card_type("36111111111111"), CardType::Diners);
    assert_eq!(detect_card_type("38111111111111"), CardType::Diners);
    assert_eq!(detect_card_type("6011111111111117"), CardType::Discover);
    assert_eq!(detect_card_type("6511111111111111"), CardType::Discover);
    // 50xx is neither Visa nor Mastercard
    assert_eq!(detect_card_type("5011111111111111"), CardType::Unknown);
}

#[test]
fn test_input_formatting_helpers() {
    assert_eq!(format_card_number("4111111111111111"), "4111 1111 1111 1111");
    assert_eq!(format_expiry("1227"), "12/27");
}

// =============================================================================
// Form Validation
// =============================================================================

#[test]
fn test_valid_form_passes() {
    assert!(card("4111 1111 1111 1111", "12/99", "123").validate().is_ok());
}

#[test]
fn test_spanish_error_messages() {
    let cases = [
        (card("1234", "12/99", "123"), "Número de tarjeta inválido"),
        (card("4111111111111111", "13/99", "123"), "Fecha de vencimiento inválida"),
        (card("4111111111111111", "01/20", "123"), "La tarjeta ha expirado"),
        (card("4111111111111111", "12/99", "12"), "CVV inválido"),
    ];
    for (details, expected) in cases {
        let err = details.validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.user_message(), expected);
    }
}

// =============================================================================
// Tax Arithmetic
// =============================================================================

#[test]
fn test_iva_reference_values() {
    let subtotal = Price::from_minor(42_000);
    assert_eq!(subtotal.tax(), Price::from_minor(7_980));
    assert_eq!(subtotal.plus(subtotal.tax()), Price::from_minor(49_980));
}

#[test]
fn test_iva_rounds_half_up_across_range() {
    for subtotal in 0..1_000_i64 {
        let tax = Price::from_minor(subtotal).tax().minor();
        // Reference: round(subtotal * 0.19) with half-up tie-breaking
        let expected = (subtotal * 19 + 50) / 100;
        assert_eq!(tax, expected, "subtotal {subtotal}");
        assert!(tax >= subtotal * 19 / 100);
    }
}
