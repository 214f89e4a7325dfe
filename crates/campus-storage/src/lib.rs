//! Durable key-value storage for the campus client.
//!
//! Session tokens live under two fixed keys ([`StorageKeys`]) so they survive
//! restarts. Backends implement [`KeyValueStorage`]:
//! - **File**: a JSON object file, the default for the CLI
//! - **Memory**: volatile, for tests and throwaway sessions

mod file;
mod keys;
mod memory;
mod tokens;
mod traits;

pub use file::FileStorage;
pub use keys::StorageKeys;
pub use memory::MemoryStorage;
pub use tokens::TokenStore;
pub use traits::KeyValueStorage;

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend-specific failure
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Stored data has an unexpected shape
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Stored data is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Create the default file-backed storage at `path`.
pub fn create_storage(path: impl Into<PathBuf>) -> StorageResult<Arc<dyn KeyValueStorage>> {
    let storage = FileStorage::new(path)?;
    Ok(Arc::new(storage))
}

/// Create a [`TokenStore`] over the default file-backed storage.
pub fn create_token_store(path: impl Into<PathBuf>) -> StorageResult<TokenStore> {
    Ok(TokenStore::new(create_storage(path)?))
}
