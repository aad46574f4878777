//! Auth session state.
//!
//! The bearer token issued by the backend identity endpoints lives in the
//! persistent on-device store under the `token` key. Its presence is the
//! sole discriminator between the anonymous and authenticated cart paths.

use secrecy::{ExposeSecret, SecretString};

use crate::storage::{KvStore, StorageError, keys};

/// A bearer token for the backend API.
///
/// Wraps `SecretString` so the token never appears in `Debug` output or
/// traces.
#[derive(Clone)]
pub struct AuthToken(SecretString);

impl AuthToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0.expose_secret())
    }

    /// The raw token, for persisting.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AuthToken").field(&"[REDACTED]").finish()
    }
}

/// Load the stored token, if any.
///
/// Read failures degrade to "not authenticated" rather than erroring: a
/// missing or unreadable token means the cart runs in local-only mode.
#[must_use]
pub fn load_token(store: &dyn KvStore) -> Option<AuthToken> {
    match store.get(keys::TOKEN) {
        Ok(Some(raw)) if !raw.is_empty() => Some(AuthToken::new(raw)),
        Ok(_) => None,
        Err(error) => {
            tracing::warn!(%error, "failed to read auth token, treating as anonymous");
            None
        }
    }
}

/// Persist a token after login.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
pub fn save_token(store: &dyn KvStore, token: &AuthToken) -> Result<(), StorageError> {
    store.put(keys::TOKEN, token.expose())
}

/// Remove the stored token on logout.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
pub fn clear_token(store: &dyn KvStore) -> Result<(), StorageError> {
    store.remove(keys::TOKEN)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_token_round_trip() {
        let store = MemoryStore::new();
        assert!(load_token(&store).is_none());

        save_token(&store, &AuthToken::new("jwt-abc")).unwrap();
        let token = load_token(&store).unwrap();
        assert_eq!(token.bearer(), "Bearer jwt-abc");

        clear_token(&store).unwrap();
        assert!(load_token(&store).is_none());
    }

    #[test]
    fn test_empty_token_is_anonymous() {
        let store = MemoryStore::new();
        store.put(keys::TOKEN, "").unwrap();
        assert!(load_token(&store).is_none());
    }

    #[test]
    fn test_debug_redacts() {
        let token = AuthToken::new("super-secret-jwt");
        let debug = format!("{token:?}");
        assert!(!debug.contains("super-secret-jwt"));
        assert!(debug.contains("REDACTED"));
    }
}
