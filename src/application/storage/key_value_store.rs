/*

Key Value Store

A key value store is a simple storage mechanism that stores string values under string keys.
The application uses it as its durable client side storage: every persisted document
(notification list, reminder configuration, clearance requests) is written wholesale under
one fixed key and read back wholesale.

This module defines the port. Adapters live in the infrastructure layer: a file backed store
that survives restarts, and an in-memory store for tests and ephemeral sessions.
*/

use thiserror::Error;

/// Result type for key value store operations
pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Synchronous durable key value storage
pub trait KeyValueStorePort: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Keys are used as file names by the file adapter, so they are kept to a safe alphabet.
pub fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && key.len() <= 128
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        && !key.starts_with('.');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
