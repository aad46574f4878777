//! Order data model (admin view).
//!
//! Orders are owned by the backend; this side only reads them and writes
//! status changes through the admin API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::OrderId;
use crate::types::invoice::InvoiceLineItem;
use crate::types::price::Price;
use crate::types::status::OrderStatus;

/// Buyer identity attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OrderUserInfo {
    pub name: String,
    pub email: String,
}

/// Invoice summary embedded in an order detail response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderInvoiceInfo {
    pub invoice_number: String,
    pub issue_date: DateTime<Utc>,
    #[serde(default)]
    pub payment_method: String,
}

/// An order as the admin panel sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_info: Option<OrderUserInfo>,
    #[serde(default)]
    pub items_details: Vec<InvoiceLineItem>,
    pub total_amount: Price,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_info: Option<OrderInvoiceInfo>,
}

/// Aggregate counters the admin dashboard shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OrderStats {
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub pending_orders: u64,
    #[serde(default)]
    pub paid_orders: u64,
    #[serde(default)]
    pub processing_orders: u64,
    #[serde(default)]
    pub shipped_orders: u64,
    #[serde(default)]
    pub delivered_orders: u64,
    #[serde(default)]
    pub cancelled_orders: u64,
    #[serde(default)]
    pub total_revenue: Price,
    #[serde(default)]
    pub monthly_revenue: Price,
    #[serde(default)]
    pub monthly_orders: u64,
}
