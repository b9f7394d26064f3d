//! Key-value persistence for client-side state.
//!
//! A [`StorageBackend`] is a small string-to-string store with the semantics
//! of browser local storage: values are replaced wholesale and removing a
//! missing key is not an error.
//!
//! - [`MemoryStorage`] keeps values in process memory (tests, ephemeral runs).
//! - [`FileStorage`] keeps values in a single JSON object on disk.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but is not a JSON object of strings.
    #[error("storage file is corrupt: {0}")]
    Corrupt(String),

    /// Serializing a value for storage failed.
    #[error("failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A lock guarding the backend was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A synchronous string key-value store.
pub trait StorageBackend: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
