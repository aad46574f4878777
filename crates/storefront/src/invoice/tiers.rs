//! Individual invoice storage tiers.

use std::sync::Mutex;

use farmachelo_core::Invoice;

use crate::storage::{self, SharedStore, StorageError, keys};

/// One place an invoice can be stored and read back from.
pub trait InvoiceTier: Send + Sync {
    /// Short tier name for log lines.
    fn name(&self) -> &'static str;

    /// Store the invoice, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the underlying store rejects the write.
    fn save(&self, invoice: &Invoice) -> Result<(), StorageError>;

    /// Read the stored invoice. Corrupt data reads as `None`.
    fn load(&self) -> Option<Invoice>;

    /// Drop the stored invoice.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the underlying store rejects the removal.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Process-local slot, the fastest tier. Lost when the process exits.
#[derive(Default)]
pub struct MemoryTier {
    slot: Mutex<Option<Invoice>>,
}

impl MemoryTier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Invoice>> {
        self.slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl InvoiceTier for MemoryTier {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn save(&self, invoice: &Invoice) -> Result<(), StorageError> {
        *self.slot() = Some(invoice.clone());
        Ok(())
    }

    fn load(&self) -> Option<Invoice> {
        self.slot().clone()
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.slot() = None;
        Ok(())
    }
}

/// Invoice stored in a key-value store under a fixed key.
struct StoreTier {
    name: &'static str,
    store: SharedStore,
    key: &'static str,
}

impl StoreTier {
    fn save(&self, invoice: &Invoice) -> Result<(), StorageError> {
        storage::put_json(self.store.as_ref(), self.key, invoice)
    }

    fn load(&self) -> Option<Invoice> {
        storage::get_json(self.store.as_ref(), self.key)
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(self.key)
    }
}

/// Persistent on-device tier; survives restarts.
pub struct PersistentTier(StoreTier);

impl PersistentTier {
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self(StoreTier {
            name: "persistent",
            store,
            key: keys::LAST_INVOICE,
        })
    }
}

impl InvoiceTier for PersistentTier {
    fn name(&self) -> &'static str {
        self.0.name
    }

    fn save(&self, invoice: &Invoice) -> Result<(), StorageError> {
        self.0.save(invoice)
    }

    fn load(&self) -> Option<Invoice> {
        self.0.load()
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.0.clear()
    }
}

/// Session-scoped tier; cleared when the session store is dropped.
pub struct SessionTier(StoreTier);

impl SessionTier {
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self(StoreTier {
            name: "session",
            store,
            key: keys::CURRENT_INVOICE,
        })
    }
}

impl InvoiceTier for SessionTier {
    fn name(&self) -> &'static str {
        self.0.name
    }

    fn save(&self, invoice: &Invoice) -> Result<(), StorageError> {
        self.0.save(invoice)
    }

    fn load(&self) -> Option<Invoice> {
        self.0.load()
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.0.clear()
    }
}
