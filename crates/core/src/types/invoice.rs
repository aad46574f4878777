//! Invoice data model.
//!
//! An invoice is created synchronously the moment a payment attempt
//! succeeds and is never updated in place; a re-payment creates a new
//! invoice with a new number.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::{InvoiceId, ProductId, TransactionId};
use crate::types::price::Price;
use crate::types::status::InvoiceStatus;

/// A line item on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    /// Unit price in minor units.
    pub unit_price: Price,
    /// `unit_price * quantity`.
    pub total_price: Price,
    #[serde(default)]
    pub requires_prescription: bool,
}

/// Customer details captured from the payment form.
///
/// Missing optional fields are rendered as empty, never as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

/// A generated invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    /// Provider-supplied, or synthesized (unique within a session).
    pub invoice_number: String,
    pub issue_date: DateTime<Utc>,
    pub status: InvoiceStatus,
    pub payment_method: String,
    pub items: Vec<InvoiceLineItem>,
    pub subtotal: Price,
    pub tax_amount: Price,
    pub discount_amount: Price,
    pub total_amount: Price,
    pub customer_info: CustomerInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
}

impl Invoice {
    /// Check the amount invariant:
    /// `total == subtotal + tax - discount`.
    #[must_use]
    pub const fn is_balanced(&self) -> bool {
        self.total_amount.minor()
            == self.subtotal.minor() + self.tax_amount.minor() - self.discount_amount.minor()
    }
}
