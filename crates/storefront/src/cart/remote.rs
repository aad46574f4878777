//! Server-owned cart for authenticated sessions.
//!
//! Every operation maps to one backend call and the server's response is
//! taken as the authoritative cart. Nothing is cached or reconciled locally;
//! a failed call surfaces as an error and the previous state stands.

use farmachelo_core::{Cart, CartItem, ProductId};

use crate::api::StorefrontApi;
use crate::error::Result;

use super::CartStore;

/// Cart store delegating to the backend cart endpoints.
pub struct RemoteCartStore {
    api: StorefrontApi,
}

impl RemoteCartStore {
    #[must_use]
    pub fn new(api: StorefrontApi) -> Self {
        Self { api }
    }
}

impl CartStore for RemoteCartStore {
    async fn load(&self) -> Result<Cart> {
        Ok(self.api.get_cart().await?)
    }

    async fn add_item(&self, item: CartItem) -> Result<Cart> {
        Ok(self.api.add_cart_item(&item).await?)
    }

    async fn update_quantity(&self, product_id: &ProductId, quantity: u32) -> Result<Cart> {
        Ok(self.api.update_cart_item(product_id, quantity).await?)
    }

    async fn remove_item(&self, product_id: &ProductId) -> Result<Cart> {
        Ok(self.api.remove_cart_item(product_id).await?)
    }

    async fn clear(&self) -> Result<Cart> {
        // The backend exposes no bulk clear; remove lines one by one and
        // keep the last response as the final state.
        let mut cart = self.api.get_cart().await?;
        let ids: Vec<ProductId> = cart.items.iter().map(|i| i.product_id.clone()).collect();
        for id in ids {
            cart = self.api.remove_cart_item(&id).await?;
        }
        Ok(cart)
    }
}
