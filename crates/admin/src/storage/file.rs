use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{StorageBackend, StorageError};

/// Storage persisted as one JSON object of string values.
///
/// Every write rewrites the whole file through a sibling temp file and a
/// rename, so readers never observe a half-written object. A missing file
/// reads as empty.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

type Items = BTreeMap<String, String>;

impl FileStorage {
    /// Use `path` as the backing file. Nothing is created until the first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_items(&self) -> Result<Items, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Items::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Items::new());
        }
        serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt(e.to_string()))
    }

    fn write_items(&self, items: &Items) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(items)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Read, modify and write back under the write lock.
    ///
    /// A corrupt file is replaced rather than blocking every later write.
    fn update(&self, f: impl FnOnce(&mut Items) -> bool) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut items = match self.read_items() {
            Ok(items) => items,
            Err(StorageError::Corrupt(reason)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %reason,
                    "Replacing corrupt storage file"
                );
                Items::new()
            }
            Err(e) => return Err(e),
        };
        if f(&mut items) {
            self.write_items(&items)?;
        }
        Ok(())
    }
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_items()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|items| {
            items.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|items| items.remove(key).is_some())
    }
}
