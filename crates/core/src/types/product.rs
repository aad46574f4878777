//! Product catalog data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::cart::CartItem;
use crate::types::id::ProductId;
use crate::types::price::Price;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit price in minor units.
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub requires_prescription: bool,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

const fn default_active() -> bool {
    true
}

impl Product {
    /// Turn this product into a cart line with the given quantity.
    #[must_use]
    pub fn to_cart_item(&self, quantity: u32) -> CartItem {
        CartItem {
            product_id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            quantity,
            requires_prescription: self.requires_prescription,
            image_url: self.image_url.clone(),
        }
    }
}

/// Payload for creating or updating a product through the admin API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub requires_prescription: bool,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_cart_item_copies_fields() {
        let product = Product {
            id: ProductId::new("p1"),
            name: "Paracetamol 500mg".to_string(),
            description: String::new(),
            price: Price::from_minor(15_000),
            category: Some("over_counter".to_string()),
            stock: 10,
            image_url: None,
            requires_prescription: false,
            active: true,
            created_at: Utc::now(),
        };

        let item = product.to_cart_item(2);
        assert_eq!(item.product_id, product.id);
        assert_eq!(item.quantity, 2);
        assert_eq!(item.line_total(), Price::from_minor(30_000));
    }

    #[test]
    fn test_active_defaults_to_true() {
        let json = r#"{
            "id": "p1",
            "name": "Ibuprofeno 400mg",
            "price": 12000,
            "stock": 5,
            "created_at": "2026-08-01T12:00:00Z"
        }"#;
        let product: Product = serde_json::from_str(json).expect("parse");
        assert!(product.active);
        assert!(!product.requires_prescription);
    }
}
