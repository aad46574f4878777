//! Invoice construction from a processed payment.

use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use farmachelo_core::{
    Cart, CustomerInfo, Invoice, InvoiceId, InvoiceLineItem, InvoiceStatus, Price, TransactionId,
};

use crate::api::PaymentResponse;
use crate::error::{AppError, Result};

/// Build the invoice for a confirmed payment.
///
/// The provider's invoice number and id are used when present; otherwise
/// both are synthesized locally (unique within a session) so the receipt
/// always has a number to show. Amounts are recomputed from the cart, not
/// taken from the response, so the invariant
/// `total == subtotal + tax - discount` holds by construction.
///
/// # Errors
///
/// Returns `AppError::PaymentFailed` if the response reports an unconfirmed
/// charge; an invoice is only ever created for a successful payment.
#[instrument(skip_all, fields(items = cart.items.len()))]
pub fn generate_invoice(
    response: &PaymentResponse,
    cart: &Cart,
    customer: CustomerInfo,
) -> Result<Invoice> {
    if !response.success {
        return Err(AppError::PaymentFailed(
            response
                .error
                .clone()
                .unwrap_or_else(|| "Pago no confirmado".to_string()),
        ));
    }

    let now = Utc::now();
    let items: Vec<InvoiceLineItem> = cart
        .items
        .iter()
        .map(|item| InvoiceLineItem {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            quantity: item.quantity,
            unit_price: item.price,
            total_price: item.line_total(),
            requires_prescription: item.requires_prescription,
        })
        .collect();

    let subtotal: Price = items.iter().map(|i| i.total_price).sum();
    let tax = subtotal.tax();

    let id = response.invoice_id.clone().map_or_else(
        || InvoiceId::new(format!("inv_{}", Uuid::new_v4().simple())),
        InvoiceId::new,
    );
    let invoice_number = response
        .invoice_number
        .clone()
        .unwrap_or_else(|| format!("FAC-{}", now.timestamp_millis()));

    let invoice = Invoice {
        id,
        invoice_number,
        issue_date: now,
        status: InvoiceStatus::Paid,
        payment_method: response
            .payment_method
            .clone()
            .unwrap_or_else(|| "card".to_string()),
        items,
        subtotal,
        tax_amount: tax,
        discount_amount: Price::ZERO,
        total_amount: subtotal.plus(tax),
        customer_info: customer,
        transaction_id: response.transaction_id.clone().map(TransactionId::new),
    };
    tracing::info!(invoice_number = %invoice.invoice_number, "invoice generated");
    Ok(invoice)
}
