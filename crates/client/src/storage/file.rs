//! # Filesystem-backed key-value store
//!
//! [`FileStore`] keeps every key in one JSON object on disk:
//!
//! ```text
//! {
//!   "auth": "{\"token\":\"...\",\"user\":{...}}",
//!   "cart:ann@library.test": "[{\"id\":1,...}]"
//! }
//! ```
//!
//! Values are the same JSON strings a browser would keep in local storage.
//! Each write replaces the whole document through a temporary file and a
//! rename, so a single `set` is atomic on disk.
//!
//! An unreadable or corrupt document reads as empty; the next write
//! replaces it.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::warn;

use super::{KeyValueStore, StorageError};

type Document = BTreeMap<String, String>;

/// Single-file persistent store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Document {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Document::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read store file");
                return Document::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Store file is corrupt, treating as empty");
            Document::new()
        })
    }

    fn write_document(&self, document: &Document) -> Result<(), StorageError> {
        let io_error = |source| StorageError::Io {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(document)?).map_err(io_error)?;
        fs::rename(&tmp, &self.path).map_err(io_error)
    }

    fn update(&self, apply: impl FnOnce(&mut Document)) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut document = self.read_document();
        apply(&mut document);
        self.write_document(&document)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.read_document().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|doc| {
            doc.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|doc| {
            doc.remove(key);
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("booklend_store_{name}_{}", std::process::id()))
            .join("storage.json")
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = temp_path("reopen");
        let _ = fs::remove_dir_all(path.parent().unwrap());

        let store = FileStore::new(&path);
        store.set("cart:guest", "[1,2]").unwrap();
        store.set("auth", "{}").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("cart:guest").as_deref(), Some("[1,2]"));
        assert_eq!(reopened.get("auth").as_deref(), Some("{}"));

        reopened.remove("auth").unwrap();
        assert_eq!(store.get("auth"), None);
        assert!(!path.with_extension("tmp").exists());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_reads_as_empty_and_is_replaced() {
        let path = temp_path("corrupt");
        let _ = fs::remove_dir_all(path.parent().unwrap());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.get("auth"), None);

        store.set("auth", "x").unwrap();
        assert_eq!(store.get("auth").as_deref(), Some("x"));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let store = FileStore::new(temp_path("missing"));
        assert_eq!(store.get("anything"), None);
    }
}
