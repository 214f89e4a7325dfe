//! Typed access to the persisted token pair.

use crate::{KeyValueStorage, StorageKeys, StorageResult};
use std::sync::Arc;

/// High-level API over the two session token keys.
///
/// Cheap to clone; clones share the same backend.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl TokenStore {
    /// Create a token store over the given storage backend
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    pub fn access_token(&self) -> StorageResult<Option<String>> {
        self.storage.get(StorageKeys::ACCESS_TOKEN)
    }

    pub fn refresh_token(&self) -> StorageResult<Option<String>> {
        self.storage.get(StorageKeys::REFRESH_TOKEN)
    }

    pub fn has_access_token(&self) -> StorageResult<bool> {
        self.storage.has(StorageKeys::ACCESS_TOKEN)
    }

    /// Replace only the access token. The refresh token is left as is.
    pub fn set_access_token(&self, token: &str) -> StorageResult<()> {
        self.storage.set(StorageKeys::ACCESS_TOKEN, token)
    }

    /// Persist a freshly issued token pair.
    ///
    /// If the refresh token cannot be written, the previous access token is
    /// restored so the pair never ends up half-updated.
    pub fn set_tokens(&self, access_token: &str, refresh_token: &str) -> StorageResult<()> {
        let previous_access = self.storage.get(StorageKeys::ACCESS_TOKEN)?;
        self.storage.set(StorageKeys::ACCESS_TOKEN, access_token)?;

        if let Err(e) = self.storage.set(StorageKeys::REFRESH_TOKEN, refresh_token) {
            let restored = match previous_access {
                Some(previous) => self.storage.set(StorageKeys::ACCESS_TOKEN, &previous),
                None => self.storage.delete(StorageKeys::ACCESS_TOKEN).map(|_| ()),
            };
            if let Err(restore_err) = restored {
                tracing::warn!(error = %restore_err, "Failed to roll back access token");
            }
            return Err(e);
        }

        Ok(())
    }

    /// Remove both tokens.
    ///
    /// Both deletions are attempted even if the first one fails; the first
    /// error is returned.
    pub fn clear(&self) -> StorageResult<()> {
        let access = self.storage.delete(StorageKeys::ACCESS_TOKEN);
        let refresh = self.storage.delete(StorageKeys::REFRESH_TOKEN);
        access?;
        refresh?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStorage, StorageError};

    /// Backend that refuses writes to one key.
    struct FailingKey {
        inner: MemoryStorage,
        failing_key: &'static str,
    }

    impl KeyValueStorage for FailingKey {
        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            if key == self.failing_key {
                return Err(StorageError::Backend(format!("cannot write {key}")));
            }
            self.inner.set(key, value)
        }

        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.inner.get(key)
        }

        fn delete(&self, key: &str) -> StorageResult<bool> {
            self.inner.delete(key)
        }
    }

    fn memory_store() -> TokenStore {
        TokenStore::new(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_set_and_clear_tokens() {
        let tokens = memory_store();
        assert!(!tokens.has_access_token().unwrap());

        tokens.set_tokens("access", "refresh").unwrap();
        assert_eq!(tokens.access_token().unwrap(), Some("access".to_string()));
        assert_eq!(tokens.refresh_token().unwrap(), Some("refresh".to_string()));

        tokens.clear().unwrap();
        assert_eq!(tokens.access_token().unwrap(), None);
        assert_eq!(tokens.refresh_token().unwrap(), None);
    }

    #[test]
    fn test_set_access_token_keeps_refresh_token() {
        let tokens = memory_store();
        tokens.set_tokens("access-1", "refresh-1").unwrap();

        tokens.set_access_token("access-2").unwrap();
        assert_eq!(tokens.access_token().unwrap(), Some("access-2".to_string()));
        assert_eq!(tokens.refresh_token().unwrap(), Some("refresh-1".to_string()));
    }

    #[test]
    fn test_clones_share_backend() {
        let tokens = memory_store();
        let clone = tokens.clone();

        tokens.set_tokens("a", "r").unwrap();
        assert_eq!(clone.access_token().unwrap(), Some("a".to_string()));

        clone.clear().unwrap();
        assert!(!tokens.has_access_token().unwrap());
    }

    #[test]
    fn test_failed_refresh_write_restores_previous_access_token() {
        let backend = FailingKey {
            inner: MemoryStorage::new(),
            failing_key: StorageKeys::REFRESH_TOKEN,
        };
        backend.inner.set(StorageKeys::ACCESS_TOKEN, "old-access").unwrap();
        let tokens = TokenStore::new(Arc::new(backend));

        assert!(tokens.set_tokens("new-access", "new-refresh").is_err());
        assert_eq!(tokens.access_token().unwrap(), Some("old-access".to_string()));
        assert_eq!(tokens.refresh_token().unwrap(), None);
    }

    #[test]
    fn test_failed_refresh_write_without_previous_token_leaves_none() {
        let tokens = TokenStore::new(Arc::new(FailingKey {
            inner: MemoryStorage::new(),
            failing_key: StorageKeys::REFRESH_TOKEN,
        }));

        assert!(tokens.set_tokens("new-access", "new-refresh").is_err());
        assert_eq!(tokens.access_token().unwrap(), None);
    }
}
