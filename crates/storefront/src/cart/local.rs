//! On-device cart for anonymous sessions.
//!
//! Every mutation is a read-modify-write against the persistent store under
//! [`keys::CART`], so the cart survives restarts. A corrupt or missing stored
//! cart reads as empty rather than failing.

use farmachelo_core::{Cart, CartItem, ProductId};

use crate::error::Result;
use crate::storage::{self, SharedStore, keys};

use super::CartStore;

/// Cart store backed by the persistent on-device key-value store.
pub struct LocalCartStore {
    store: SharedStore,
}

impl LocalCartStore {
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    fn read(&self) -> Cart {
        storage::get_json(self.store.as_ref(), keys::CART).unwrap_or_else(Cart::empty)
    }

    fn write(&self, cart: &Cart) -> Result<()> {
        storage::put_json(self.store.as_ref(), keys::CART, cart)?;
        Ok(())
    }
}

impl CartStore for LocalCartStore {
    async fn load(&self) -> Result<Cart> {
        Ok(self.read())
    }

    async fn add_item(&self, item: CartItem) -> Result<Cart> {
        let mut cart = self.read();
        cart.upsert(item);
        self.write(&cart)?;
        Ok(cart)
    }

    async fn update_quantity(&self, product_id: &ProductId, quantity: u32) -> Result<Cart> {
        let mut cart = self.read();
        cart.set_quantity(product_id, quantity);
        self.write(&cart)?;
        Ok(cart)
    }

    async fn remove_item(&self, product_id: &ProductId) -> Result<Cart> {
        let mut cart = self.read();
        cart.remove(product_id);
        self.write(&cart)?;
        Ok(cart)
    }

    async fn clear(&self) -> Result<Cart> {
        let cart = Cart::empty();
        self.write(&cart)?;
        Ok(cart)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::MemoryStore;
    use farmachelo_core::Price;

    fn item(id: &str, price: i64, quantity: u32) -> CartItem {
        CartItem {
            product_id: ProductId::new(id),
            name: format!("Producto {id}"),
            price: Price::from_minor(price),
            quantity,
            requires_prescription: false,
            image_url: None,
        }
    }

    fn store() -> LocalCartStore {
        LocalCartStore::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_add_merges_existing_line() {
        let store = store();
        store.add_item(item("p1", 15_000, 2)).await.unwrap();
        let cart = store.add_item(item("p1", 15_000, 1)).await.unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 3);
        assert_eq!(cart.total, Price::from_minor(45_000));
    }

    #[tokio::test]
    async fn test_update_quantity_zero_removes() {
        let store = store();
        store.add_item(item("p1", 15_000, 2)).await.unwrap();
        let cart = store
            .update_quantity(&ProductId::new("p1"), 0)
            .await
            .unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.total, Price::ZERO);
    }

    #[tokio::test]
    async fn test_unknown_product_is_a_noop() {
        let store = store();
        store.add_item(item("p1", 15_000, 1)).await.unwrap();
        let cart = store.remove_item(&ProductId::new("missing")).await.unwrap();
        assert_eq!(cart.items.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_persists_empty_cart() {
        let store = store();
        store.add_item(item("p1", 15_000, 1)).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }
}
