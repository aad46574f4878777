//! Shopping cart data model.
//!
//! One cart is active per browser session. Items keep insertion order, a
//! quantity is always at least 1 (an item reduced to zero is removed, never
//! stored), and `total` is the derived sum of `price * quantity` kept in
//! lockstep with the items by every mutating method.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::{ProductId, UserId};
use crate::types::price::Price;

/// A single line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    /// Unit price in minor units.
    pub price: Price,
    /// Always >= 1 while stored in a cart.
    pub quantity: u32,
    #[serde(default)]
    pub requires_prescription: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CartItem {
    /// Line total: unit price times quantity.
    #[must_use]
    pub const fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// The shopping cart.
///
/// `owner_id` is `None` for an anonymous (device-only) cart and set once the
/// backend owns the cart for an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
    #[serde(default)]
    pub items: Vec<CartItem>,
    /// Derived: sum of `price * quantity` over items.
    #[serde(default)]
    pub total: Price,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Create an empty anonymous cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            owner_id: None,
            items: Vec::new(),
            total: Price::ZERO,
            updated_at: Utc::now(),
        }
    }

    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pure fold over current items. Returns zero for an empty cart.
    #[must_use]
    pub fn compute_total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Merge an item into the cart: increment the quantity if the product is
    /// already present, otherwise append at the end (insertion order).
    pub fn upsert(&mut self, item: CartItem) {
        if item.quantity == 0 {
            return;
        }
        match self
            .items
            .iter_mut()
            .find(|it| it.product_id == item.product_id)
        {
            Some(existing) => existing.quantity += item.quantity,
            None => self.items.push(item),
        }
        self.touch();
    }

    /// Set the quantity of a line. Zero removes the line; a missing product
    /// is a no-op (the UI can only click what it rendered).
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|it| &it.product_id == product_id) {
            item.quantity = quantity;
        }
        self.touch();
    }

    /// Remove a line by product ID.
    pub fn remove(&mut self, product_id: &ProductId) {
        self.items.retain(|it| &it.product_id != product_id);
        self.touch();
    }

    /// Drop all items.
    pub fn clear(&mut self) {
        self.items.clear();
        self.touch();
    }

    /// Recompute the cached total and stamp `updated_at`.
    fn touch(&mut self) {
        self.total = self.compute_total();
        self.updated_at = Utc::now();
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::empty()
    }
}
