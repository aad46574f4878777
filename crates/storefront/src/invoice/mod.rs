//! Invoice generation, redundant persistence, and resolution.
//!
//! A confirmed payment produces an invoice that is written to every storage
//! tier at once: a process-local slot, the persistent store, and the session
//! store. The receipt page later resolves the invoice by walking the tiers
//! in priority order; if every tier comes up empty it falls back to a demo
//! invoice so the page always renders, flagged so the caller can warn.

mod generate;
mod tiers;

pub use generate::generate_invoice;
pub use tiers::{InvoiceTier, MemoryTier, PersistentTier, SessionTier};

use chrono::Utc;
use tracing::instrument;

use farmachelo_core::{
    CustomerInfo, Invoice, InvoiceId, InvoiceLineItem, InvoiceStatus, Price, ProductId,
};

use crate::storage::SharedStore;

// =============================================================================
// Resolution
// =============================================================================

/// Where a resolved invoice came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceSource {
    /// The process-local slot written during this session's checkout.
    Memory,
    /// The persistent on-device store (survives restarts).
    Persistent,
    /// The session store (cleared when the session ends).
    Session,
    /// No tier had an invoice; a placeholder was synthesized.
    Demo,
}

/// A resolved invoice plus its provenance.
#[derive(Debug, Clone)]
pub struct ResolvedInvoice {
    pub invoice: Invoice,
    pub source: InvoiceSource,
}

impl ResolvedInvoice {
    /// Whether this is placeholder data rather than a real purchase record.
    #[must_use]
    pub const fn is_demo(&self) -> bool {
        matches!(self.source, InvoiceSource::Demo)
    }
}

/// The tiered invoice store.
///
/// Persistence is best-effort per tier: a failing tier is logged and the
/// rest still get the write. Resolution walks the same tiers in priority
/// order and takes the first hit.
pub struct InvoicePipeline {
    tiers: Vec<(InvoiceSource, Box<dyn InvoiceTier>)>,
}

impl InvoicePipeline {
    /// Build the standard three-tier pipeline.
    #[must_use]
    pub fn new(persistent: SharedStore, session: SharedStore) -> Self {
        Self {
            tiers: vec![
                (InvoiceSource::Memory, Box::new(MemoryTier::new())),
                (
                    InvoiceSource::Persistent,
                    Box::new(PersistentTier::new(persistent)),
                ),
                (InvoiceSource::Session, Box::new(SessionTier::new(session))),
            ],
        }
    }

    /// Write the invoice to every tier. Tier failures are logged and do not
    /// abort the remaining writes; at worst the invoice only lives in the
    /// process-local slot for the rest of the session.
    #[instrument(skip_all, fields(invoice_number = %invoice.invoice_number))]
    pub fn persist(&self, invoice: &Invoice) {
        for (source, tier) in &self.tiers {
            if let Err(error) = tier.save(invoice) {
                tracing::warn!(tier = tier.name(), %error, "invoice tier write failed");
            } else {
                tracing::debug!(tier = tier.name(), ?source, "invoice persisted");
            }
        }
    }

    /// Resolve the most recent invoice, falling back to demo data.
    ///
    /// A corrupt entry in one tier is skipped (logged inside the tier) and
    /// resolution continues with the next.
    #[instrument(skip(self))]
    pub fn resolve(&self) -> ResolvedInvoice {
        for (source, tier) in &self.tiers {
            if let Some(invoice) = tier.load() {
                tracing::debug!(tier = tier.name(), "invoice resolved");
                return ResolvedInvoice {
                    invoice,
                    source: *source,
                };
            }
        }
        tracing::warn!("no stored invoice found, serving demo data");
        ResolvedInvoice {
            invoice: demo_invoice(),
            source: InvoiceSource::Demo,
        }
    }

    /// Drop the invoice from every tier.
    pub fn clear(&self) {
        for (_, tier) in &self.tiers {
            if let Err(error) = tier.clear() {
                tracing::warn!(tier = tier.name(), %error, "invoice tier clear failed");
            }
        }
    }
}

// =============================================================================
// Demo Fallback
// =============================================================================

/// Placeholder invoice served when no real invoice can be resolved.
///
/// The amounts follow the standard checkout arithmetic so the rendered
/// receipt is internally consistent.
#[must_use]
pub fn demo_invoice() -> Invoice {
    let now = Utc::now();
    let items = vec![
        InvoiceLineItem {
            product_id: ProductId::new("demo-1"),
            name: "Paracetamol 500mg".to_string(),
            quantity: 2,
            unit_price: Price::from_minor(15_000),
            total_price: Price::from_minor(30_000),
            requires_prescription: false,
        },
        InvoiceLineItem {
            product_id: ProductId::new("demo-2"),
            name: "Ibuprofeno 400mg".to_string(),
            quantity: 1,
            unit_price: Price::from_minor(12_000),
            total_price: Price::from_minor(12_000),
            requires_prescription: false,
        },
    ];
    let subtotal: Price = items.iter().map(|i| i.total_price).sum();
    let tax = subtotal.tax();

    Invoice {
        id: InvoiceId::new(format!("inv_demo_{}", now.timestamp_millis())),
        invoice_number: format!("FAC-DEMO-{}", now.timestamp_millis()),
        issue_date: now,
        status: InvoiceStatus::Paid,
        payment_method: "card".to_string(),
        items,
        subtotal,
        tax_amount: tax,
        discount_amount: Price::ZERO,
        total_amount: subtotal.plus(tax),
        customer_info: CustomerInfo {
            name: "Cliente Demo".to_string(),
            email: "cliente@demo.com".to_string(),
            phone: String::new(),
            address: String::new(),
        },
        transaction_id: None,
    }
}
