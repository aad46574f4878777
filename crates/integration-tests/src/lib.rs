//! Integration tests for Farmachelo.
//!
//! Cross-crate scenario tests: cart reconciliation against both storage
//! tiers, the invoice pipeline end to end, checkout validation, and the
//! admin CSV export. No live backend is required; everything runs against
//! in-memory and temp-dir stores.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p farmachelo-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::{TimeZone, Utc};
use farmachelo_core::{
    CustomerInfo, Invoice, InvoiceId, InvoiceLineItem, InvoiceStatus, Price, Product, ProductId,
};

/// A catalog product fixture.
#[must_use]
pub fn product(id: &str, name: &str, price_minor: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: String::new(),
        price: Price::from_minor(price_minor),
        category: Some("over_counter".to_string()),
        stock: 100,
        image_url: None,
        requires_prescription: false,
        active: true,
        created_at: Utc::now(),
    }
}

/// A balanced single-line invoice fixture.
#[must_use]
pub fn invoice(number: &str, customer: &str) -> Invoice {
    let subtotal = Price::from_minor(42_000);
    let tax = subtotal.tax();
    Invoice {
        id: InvoiceId::new(format!("inv_{number}")),
        invoice_number: number.to_string(),
        issue_date: Utc.with_ymd_and_hms(2026, 8, 15, 10, 30, 0).single().unwrap_or_default(),
        status: InvoiceStatus::Paid,
        payment_method: "card".to_string(),
        items: vec![InvoiceLineItem {
            product_id: ProductId::new("p1"),
            name: "Paracetamol 500mg".to_string(),
            quantity: 2,
            unit_price: Price::from_minor(21_000),
            total_price: subtotal,
            requires_prescription: false,
        }],
        subtotal,
        tax_amount: tax,
        discount_amount: Price::ZERO,
        total_amount: subtotal.plus(tax),
        customer_info: CustomerInfo {
            name: customer.to_string(),
            email: "cliente@example.com".to_string(),
            phone: String::new(),
            address: String::new(),
        },
        transaction_id: None,
    }
}
