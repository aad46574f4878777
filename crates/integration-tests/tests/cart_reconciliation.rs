//! Cart reconciliation scenarios across storage tiers.
//!
//! Covers the anonymous (on-device) path end to end, persistence across
//! process restarts via the file store, and session routing by token
//! presence.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use farmachelo_core::{CartItem, Price, ProductId};
use farmachelo_integration_tests::product;
use farmachelo_storefront::api::StorefrontApi;
use farmachelo_storefront::cart::{CartManager, LocalCartStore, SessionCart};
use farmachelo_storefront::storage::{FileStore, MemoryStore, SharedStore, keys};
use farmachelo_storefront::StorefrontConfig;

fn memory_store() -> SharedStore {
    Arc::new(MemoryStore::new())
}

// =============================================================================
// Anonymous Cart Lifecycle
// =============================================================================

#[tokio::test]
async fn test_anonymous_cart_lifecycle() {
    let manager = CartManager::new(LocalCartStore::new(memory_store())).await;
    assert_eq!(manager.total().await, Price::ZERO);

    let cart = manager.add_item(&product("p1", "Paracetamol 500mg", 15_000), 2).await;
    assert_eq!(cart.items.len(), 1);
    assert_eq!(manager.total().await, Price::from_minor(30_000));

    let cart = manager.remove_item(&ProductId::new("p1")).await;
    assert!(cart.is_empty());
    assert_eq!(manager.total().await, Price::ZERO);
}

#[tokio::test]
async fn test_total_is_sum_of_lines_after_any_sequence() {
    let manager = CartManager::new(LocalCartStore::new(memory_store())).await;

    manager.add_item(&product("p1", "Paracetamol 500mg", 15_000), 2).await;
    manager.add_item(&product("p2", "Ibuprofeno 400mg", 12_000), 1).await;
    manager.add_item(&product("p1", "Paracetamol 500mg", 15_000), 3).await;
    manager.update_quantity(&ProductId::new("p2"), 4).await;
    manager.remove_item(&ProductId::new("p1")).await;

    let cart = manager.cart().await;
    let expected: Price = cart.items.iter().map(CartItem::line_total).sum();
    assert_eq!(cart.total, expected);
    assert_eq!(cart.total, Price::from_minor(48_000));
}

#[tokio::test]
async fn test_zero_quantity_equals_removal() {
    let manager = CartManager::new(LocalCartStore::new(memory_store())).await;
    manager.add_item(&product("p1", "Paracetamol 500mg", 15_000), 2).await;

    let via_zero = manager.update_quantity(&ProductId::new("p1"), 0).await;
    assert!(via_zero.is_empty());

    manager.add_item(&product("p1", "Paracetamol 500mg", 15_000), 2).await;
    let via_negative = manager.update_quantity(&ProductId::new("p1"), -3).await;
    assert!(via_negative.is_empty());
}

// =============================================================================
// Persistence Across Restarts
// =============================================================================

#[tokio::test]
async fn test_cart_survives_restart_via_file_store() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store: SharedStore = Arc::new(FileStore::open(dir.path()).unwrap());
        let manager = CartManager::new(LocalCartStore::new(store)).await;
        manager.add_item(&product("p1", "Paracetamol 500mg", 15_000), 2).await;
        manager.add_item(&product("p2", "Ibuprofeno 400mg", 12_000), 1).await;
    }

    // A fresh manager over the same directory sees the same cart
    let store: SharedStore = Arc::new(FileStore::open(dir.path()).unwrap());
    let manager = CartManager::new(LocalCartStore::new(store)).await;
    let cart = manager.cart().await;
    assert_eq!(cart.items.len(), 2);
    assert_eq!(cart.total, Price::from_minor(42_000));
}

#[tokio::test]
async fn test_corrupt_persisted_cart_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store: SharedStore = Arc::new(FileStore::open(dir.path()).unwrap());
    store.put(keys::CART, "not json at all").unwrap();

    let manager = CartManager::new(LocalCartStore::new(store)).await;
    assert!(manager.cart().await.is_empty());
}

// =============================================================================
// Login Migration
// =============================================================================

#[tokio::test]
async fn test_login_migration_merges_quantities_and_clears_local() {
    let local = CartManager::new(LocalCartStore::new(memory_store())).await;
    local.add_item(&product("p1", "Paracetamol 500mg", 15_000), 2).await;
    local.add_item(&product("p2", "Ibuprofeno 400mg", 12_000), 1).await;

    // Simulate the account's existing cart on the other side
    let remote_side = LocalCartStore::new(memory_store());
    use farmachelo_storefront::cart::CartStore;
    remote_side
        .add_item(product("p1", "Paracetamol 500mg", 15_000).to_cart_item(1))
        .await
        .unwrap();

    let merged = local.migrate_into(&remote_side).await.unwrap();
    let p1 = merged
        .items
        .iter()
        .find(|i| i.product_id.as_str() == "p1")
        .unwrap();
    assert_eq!(p1.quantity, 3);
    assert_eq!(merged.total, Price::from_minor(57_000));
    assert!(local.cart().await.is_empty());
}

// =============================================================================
// Session Routing
// =============================================================================

#[tokio::test]
async fn test_session_routes_local_without_token() {
    let config = StorefrontConfig::new("http://localhost:8000", "/tmp/farmachelo").unwrap();
    let api = StorefrontApi::new(&config);

    let session = SessionCart::select(memory_store(), &api).await;
    assert!(matches!(session, SessionCart::Anonymous(_)));

    // The local route works fully offline
    session.add_item(&product("p1", "Paracetamol 500mg", 15_000), 1).await;
    assert_eq!(session.total().await, Price::from_minor(15_000));
}

#[tokio::test]
async fn test_session_routes_remote_with_token() {
    let config = StorefrontConfig::new("http://localhost:8000", "/tmp/farmachelo").unwrap();
    let api = StorefrontApi::new(&config);

    let store = memory_store();
    store.put(keys::TOKEN, "jwt-token").unwrap();

    let session = SessionCart::select(store, &api).await;
    assert!(matches!(session, SessionCart::Authenticated(_)));
    assert!(api.has_token());
}

#[tokio::test]
async fn test_empty_token_routes_local() {
    let config = StorefrontConfig::new("http://localhost:8000", "/tmp/farmachelo").unwrap();
    let api = StorefrontApi::new(&config);

    let store = memory_store();
    store.put(keys::TOKEN, "").unwrap();

    let session = SessionCart::select(store, &api).await;
    assert!(matches!(session, SessionCart::Anonymous(_)));
}
