use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{StorageBackend, StorageError};

/// In-memory storage for tests and sessions that should not outlive the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let storage = MemoryStorage::new();
        assert!(storage.get_item("admin").unwrap().is_none());

        storage.set_item("admin", "one").unwrap();
        storage.set_item("admin", "two").unwrap();
        assert_eq!(storage.get_item("admin").unwrap().as_deref(), Some("two"));

        storage.remove_item("admin").unwrap();
        storage.remove_item("admin").unwrap();
        assert!(storage.get_item("admin").unwrap().is_none());
    }

    #[test]
    fn test_clones_share_items() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        storage.set_item("k", "v").unwrap();
        assert_eq!(other.get_item("k").unwrap().as_deref(), Some("v"));
    }
}
