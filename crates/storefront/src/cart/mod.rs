//! Cart reconciliation.
//!
//! The cart has two homes: on-device storage for anonymous users and the
//! backend for authenticated ones. The presence of a valid auth token is the
//! sole discriminator, checked once per session when the [`SessionCart`] is
//! selected - never mid-operation, so no operation ever spans both
//! representations.
//!
//! [`CartStore`] is the seam: one interface, two implementations
//! ([`LocalCartStore`], [`RemoteCartStore`]). [`CartManager`] wraps the
//! selected store and serializes mutations through an async lock so rapid
//! repeated clicks cannot interleave two read-modify-write cycles.

mod local;
mod remote;

pub use local::LocalCartStore;
pub use remote::RemoteCartStore;

use tokio::sync::Mutex;
use tracing::instrument;

use farmachelo_core::{Cart, CartItem, Price, Product, ProductId};

use crate::api::StorefrontApi;
use crate::error::Result;
use crate::session;
use crate::storage::SharedStore;

/// Uniform cart operations, independent of where the cart lives.
///
/// Every method returns the full updated cart; for the remote store that is
/// the server's response verbatim (the server is authoritative post-call).
pub trait CartStore: Send + Sync {
    /// Load the current cart.
    fn load(&self) -> impl Future<Output = Result<Cart>> + Send;

    /// Merge an item in: increment quantity if present, else append.
    fn add_item(&self, item: CartItem) -> impl Future<Output = Result<Cart>> + Send;

    /// Set a line's quantity (callers handle the zero-means-remove rule).
    fn update_quantity(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> impl Future<Output = Result<Cart>> + Send;

    /// Remove a line.
    fn remove_item(&self, product_id: &ProductId) -> impl Future<Output = Result<Cart>> + Send;

    /// Drop all lines.
    fn clear(&self) -> impl Future<Output = Result<Cart>> + Send;
}

/// Owns the selected store and the in-memory cart state.
///
/// Failures are absorbed: a failed mutation is logged and leaves the state
/// unchanged (the UI stays interactive and the user retries manually).
pub struct CartManager<S> {
    store: S,
    state: Mutex<Cart>,
}

impl<S: CartStore> CartManager<S> {
    /// Create a manager, loading the cart from the store. A load failure
    /// starts from an empty cart rather than erroring.
    pub async fn new(store: S) -> Self {
        let state = match store.load().await {
            Ok(cart) => cart,
            Err(error) => {
                tracing::warn!(%error, "failed to load cart, starting empty");
                Cart::empty()
            }
        };
        Self {
            store,
            state: Mutex::new(state),
        }
    }

    /// Add a product to the cart. Returns the updated cart.
    #[instrument(skip(self, product), fields(product_id = %product.id, quantity))]
    pub async fn add_item(&self, product: &Product, quantity: u32) -> Cart {
        let mut state = self.state.lock().await;
        match self.store.add_item(product.to_cart_item(quantity)).await {
            Ok(cart) => *state = cart,
            Err(error) => tracing::warn!(%error, "add to cart failed, keeping previous state"),
        }
        state.clone()
    }

    /// Set a line's quantity. Zero or negative removes the line.
    #[instrument(skip(self), fields(product_id = %product_id, quantity))]
    pub async fn update_quantity(&self, product_id: &ProductId, quantity: i64) -> Cart {
        if quantity <= 0 {
            return self.remove_item(product_id).await;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let quantity = quantity as u32;
        let mut state = self.state.lock().await;
        match self.store.update_quantity(product_id, quantity).await {
            Ok(cart) => *state = cart,
            Err(error) => tracing::warn!(%error, "quantity update failed, keeping previous state"),
        }
        state.clone()
    }

    /// Remove a line from the cart.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_item(&self, product_id: &ProductId) -> Cart {
        let mut state = self.state.lock().await;
        match self.store.remove_item(product_id).await {
            Ok(cart) => *state = cart,
            Err(error) => tracing::warn!(%error, "remove from cart failed, keeping previous state"),
        }
        state.clone()
    }

    /// Empty the cart (successful checkout or explicit clear).
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Cart {
        let mut state = self.state.lock().await;
        match self.store.clear().await {
            Ok(cart) => *state = cart,
            Err(error) => tracing::warn!(%error, "cart clear failed, keeping previous state"),
        }
        state.clone()
    }

    /// Pure fold over current items. Zero for an empty cart.
    pub async fn total(&self) -> Price {
        self.state.lock().await.compute_total()
    }

    /// Snapshot of the current cart.
    pub async fn cart(&self) -> Cart {
        self.state.lock().await.clone()
    }
}

impl CartManager<LocalCartStore> {
    /// Replay the local cart into another store after login, then clear
    /// the local copy. The target merges by incrementing quantities of
    /// products it already holds, so nothing from either side is dropped.
    ///
    /// # Errors
    ///
    /// Any target failure aborts the migration with the local cart intact,
    /// so nothing is lost; the caller may retry.
    pub async fn migrate_into<R: CartStore>(&self, target: &R) -> Result<Cart> {
        let mut state = self.state.lock().await;
        let mut merged = target.load().await?;
        for item in &state.items {
            merged = target.add_item(item.clone()).await?;
        }
        self.store.clear().await?;
        *state = Cart::empty();
        Ok(merged)
    }

    /// [`Self::migrate_into`] the backend cart.
    ///
    /// # Errors
    ///
    /// Propagates any remote failure; the local cart stays intact.
    #[instrument(skip(self, api))]
    pub async fn migrate_to_remote(&self, api: &StorefrontApi) -> Result<Cart> {
        self.migrate_into(&RemoteCartStore::new(api.clone())).await
    }
}

/// The per-session cart, routed once at selection time.
pub enum SessionCart {
    /// No token: the cart lives in on-device storage.
    Anonymous(CartManager<LocalCartStore>),
    /// Token present: the backend owns the cart.
    Authenticated(CartManager<RemoteCartStore>),
}

impl SessionCart {
    /// Select the cart route for this session from the stored token.
    ///
    /// An installed token also gets handed to the API client so subsequent
    /// calls authenticate.
    pub async fn select(persistent: SharedStore, api: &StorefrontApi) -> Self {
        if let Some(token) = session::load_token(persistent.as_ref()) {
            api.set_token(token);
            Self::Authenticated(CartManager::new(RemoteCartStore::new(api.clone())).await)
        } else {
            Self::Anonymous(CartManager::new(LocalCartStore::new(persistent)).await)
        }
    }

    /// Add a product to the cart.
    pub async fn add_item(&self, product: &Product, quantity: u32) -> Cart {
        match self {
            Self::Anonymous(m) => m.add_item(product, quantity).await,
            Self::Authenticated(m) => m.add_item(product, quantity).await,
        }
    }

    /// Set a line's quantity (zero or negative removes it).
    pub async fn update_quantity(&self, product_id: &ProductId, quantity: i64) -> Cart {
        match self {
            Self::Anonymous(m) => m.update_quantity(product_id, quantity).await,
            Self::Authenticated(m) => m.update_quantity(product_id, quantity).await,
        }
    }

    /// Remove a line.
    pub async fn remove_item(&self, product_id: &ProductId) -> Cart {
        match self {
            Self::Anonymous(m) => m.remove_item(product_id).await,
            Self::Authenticated(m) => m.remove_item(product_id).await,
        }
    }

    /// Empty the cart.
    pub async fn clear(&self) -> Cart {
        match self {
            Self::Anonymous(m) => m.clear().await,
            Self::Authenticated(m) => m.clear().await,
        }
    }

    /// Current cart total.
    pub async fn total(&self) -> Price {
        match self {
            Self::Anonymous(m) => m.total().await,
            Self::Authenticated(m) => m.total().await,
        }
    }

    /// Snapshot of the current cart.
    pub async fn cart(&self) -> Cart {
        match self {
            Self::Anonymous(m) => m.cart().await,
            Self::Authenticated(m) => m.cart().await,
        }
    }

    /// Promote an anonymous session to an authenticated one after login,
    /// migrating the local cart into the remote one.
    ///
    /// On migration failure the session stays anonymous with the local
    /// cart intact (the failure is logged); calling again retries. The
    /// returned variant tells the caller which way it went. An already
    /// authenticated session is returned as-is.
    pub async fn login_migrate(self, api: &StorefrontApi) -> Self {
        match self {
            Self::Anonymous(manager) => match manager.migrate_to_remote(api).await {
                Ok(_) => {
                    Self::Authenticated(CartManager::new(RemoteCartStore::new(api.clone())).await)
                }
                Err(error) => {
                    tracing::warn!(%error, "cart migration failed, staying on local cart");
                    Self::Anonymous(manager)
                }
            },
            authenticated @ Self::Authenticated(_) => authenticated,
        }
    }
}
