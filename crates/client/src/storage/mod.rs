//! Persistent key-value storage.
//!
//! The client keeps a couple of small JSON documents between runs: the
//! authentication record and one cart per identity namespace. Storage is a
//! synchronous string-to-string map behind [`KeyValueStore`], injected into
//! everything that needs it.
//!
//! # Implementations
//!
//! - [`MemoryStore`] - process-local, used in tests
//! - [`FileStore`] - a single JSON file on disk, used by the CLI
//!
//! # Concurrency
//!
//! Stores serialize access within one process. Nothing coordinates separate
//! processes sharing a file, so two writers doing read-modify-write on the
//! same key can lose an update.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Store key holding the authentication record.
pub const AUTH_KEY: &str = "auth";

/// Errors that can occur when writing to a store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The backing document could not be encoded.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A synchronous, string-keyed persistent store.
///
/// Reads never fail: a value that cannot be read is reported as absent.
pub trait KeyValueStore {
    /// Get the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal could not be persisted.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
