//! On-device key-value storage.
//!
//! The Rust rendition of browser storage: a [`KvStore`] trait with a
//! session-scoped in-memory implementation and a persistent file-backed one.
//! Values are JSON strings under well-known keys; readers must tolerate
//! absent or malformed values by falling back to defaults, so the typed
//! helpers here return `None` on corrupt data instead of an error.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Well-known storage keys.
pub mod keys {
    /// Auth bearer token.
    pub const TOKEN: &str = "token";
    /// Anonymous cart envelope (`{items, total, updated_at}`).
    pub const CART: &str = "cart";
    /// Full invoice envelope, persistent tier.
    pub const LAST_INVOICE: &str = "last_invoice_data";
    /// Full invoice envelope, session tier.
    pub const CURRENT_INVOICE: &str = "current_invoice";
}

/// Errors that can occur when accessing a store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized.
    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A string key-value store, the shape browser storage exposes.
///
/// Implementations are synchronous: all backing media are on-device.
pub trait KvStore: Send + Sync {
    /// Read the raw string under `key`, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write the raw string under `key` (last-write-wins, no versioning).
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key` if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// A shareable handle to any store.
pub type SharedStore = Arc<dyn KvStore>;

/// Read and deserialize a JSON value.
///
/// Absent keys, read failures, and malformed JSON all collapse to `None`;
/// parse failures are logged so corrupt state is visible in traces.
pub fn get_json<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(error) => {
            tracing::warn!(key, %error, "failed to read stored value");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::warn!(key, %error, "stored value is malformed, treating as absent");
            None
        }
    }
}

/// Serialize and write a JSON value.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn put_json<T: Serialize>(
    store: &dyn KvStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.put(key, &raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_get_json_tolerates_malformed_value() {
        let store = MemoryStore::new();
        store.put(keys::CART, "{not json").unwrap();
        let value: Option<serde_json::Value> = get_json(&store, keys::CART);
        assert!(value.is_none());
    }

    #[test]
    fn test_put_then_get_json() {
        let store = MemoryStore::new();
        put_json(&store, "k", &serde_json::json!({"a": 1})).unwrap();
        let value: serde_json::Value = get_json(&store, "k").unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_get_json_absent_key() {
        let store = MemoryStore::new();
        let value: Option<serde_json::Value> = get_json(&store, "missing");
        assert!(value.is_none());
    }
}
