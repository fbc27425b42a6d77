//! Authenticated session.
//!
//! The access/refresh pair lives in a [`KeyValueStore`] under the `access`
//! and `refresh` keys. Views receive a [`SessionStore`] and re-read the token
//! whenever they load; there is no change notification between views.
//! The refresh token is stored but never used to renew the session, and an
//! absent access token means "logged out".

pub mod image_cache;

pub use image_cache::LocalImageCache;

use crate::storage::{KeyValueStore, StorageResult};
use log::warn;
use std::sync::Arc;

/// Storage key of the access token
pub const ACCESS_KEY: &str = "access";
/// Storage key of the refresh token
pub const REFRESH_KEY: &str = "refresh";

/// Tokens currently held by the session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

/// Injected session service over persistent storage
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persisted access token, if any
    pub fn get_token(&self) -> Option<String> {
        self.store.get(ACCESS_KEY).filter(|token| !token.is_empty())
    }

    /// Persisted refresh token, if any
    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(REFRESH_KEY).filter(|token| !token.is_empty())
    }

    /// Persist both tokens.
    ///
    /// If the refresh token cannot be written the previous access token is
    /// put back, so a failed login never leaves a half-written session.
    pub fn set_tokens(&self, access: &str, refresh: &str) -> StorageResult<()> {
        let previous = self.store.get(ACCESS_KEY);
        self.store.set(ACCESS_KEY, access)?;

        if let Err(e) = self.store.set(REFRESH_KEY, refresh) {
            let restored = match previous {
                Some(token) => self.store.set(ACCESS_KEY, &token),
                None => self.store.remove(ACCESS_KEY),
            };
            if let Err(restore_err) = restored {
                warn!("Could not roll back access token: {}", restore_err);
            }
            return Err(e);
        }
        Ok(())
    }

    /// Remove both tokens. Both removals are attempted even if the first fails.
    pub fn clear(&self) -> StorageResult<()> {
        let access = self.store.remove(ACCESS_KEY);
        let refresh = self.store.remove(REFRESH_KEY);
        access.and(refresh)
    }

    pub fn is_authenticated(&self) -> bool {
        self.get_token().is_some()
    }

    /// Both tokens as currently persisted
    pub fn snapshot(&self) -> Session {
        Session {
            access_token: self.get_token(),
            refresh_token: self.refresh_token(),
        }
    }

    /// Underlying store, shared with other per-user client state
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError};

    fn session() -> SessionStore {
        SessionStore::new(Arc::new(MemoryStore::new()))
    }

    /// Memory store whose refresh-token writes fail
    struct RefreshWriteFails(MemoryStore);

    impl KeyValueStore for RefreshWriteFails {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            if key == REFRESH_KEY {
                return Err(StorageError::Io(std::io::Error::other("disk full")));
            }
            self.0.set(key, value)
        }

        fn remove(&self, key: &str) -> StorageResult<()> {
            self.0.remove(key)
        }
    }

    #[test]
    fn test_starts_logged_out() {
        let session = session();
        assert!(session.get_token().is_none());
        assert!(!session.is_authenticated());
        assert_eq!(session.snapshot(), Session::default());
    }

    #[test]
    fn test_set_tokens_persists_both() {
        let session = session();
        session.set_tokens("acc", "ref").unwrap();

        assert_eq!(session.get_token().as_deref(), Some("acc"));
        assert_eq!(session.refresh_token().as_deref(), Some("ref"));
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_failed_refresh_write_leaves_logged_out() {
        let session = SessionStore::new(Arc::new(RefreshWriteFails(MemoryStore::new())));

        assert!(session.set_tokens("acc", "ref").is_err());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_failed_refresh_write_restores_previous_token() {
        let store = RefreshWriteFails(MemoryStore::new());
        store.0.set(ACCESS_KEY, "old").unwrap();
        let session = SessionStore::new(Arc::new(store));

        assert!(session.set_tokens("new", "ref").is_err());
        assert_eq!(session.get_token().as_deref(), Some("old"));
    }

    #[test]
    fn test_clear_removes_both() {
        let session = session();
        session.set_tokens("acc", "ref").unwrap();
        session.clear().unwrap();

        assert_eq!(session.snapshot(), Session::default());
    }

    #[test]
    fn test_clones_share_storage() {
        let session = session();
        let other_view = session.clone();

        session.set_tokens("acc", "ref").unwrap();
        assert!(other_view.is_authenticated());

        other_view.clear().unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_empty_token_is_logged_out() {
        let store = Arc::new(MemoryStore::new());
        store.set(ACCESS_KEY, "").unwrap();
        let session = SessionStore::new(store);
        assert!(!session.is_authenticated());
    }
}
