//! Persistent local key/value storage.
//!
//! Mirrors the browser's `localStorage`: string keys, string values, no
//! transactions. Two keys are used by the storefront: [`TOKEN_KEY`] and
//! [`CART_KEY`].

mod file;

use anyhow::Result;
use std::collections::HashMap;
use std::sync::Mutex;

pub use file::FileStorage;

/// Session credential.
pub const TOKEN_KEY: &str = "token";

/// JSON array of cart entries.
pub const CART_KEY: &str = "cart";

#[cfg_attr(test, mockall::automock)]
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage
            .items
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        storage
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);

        storage.set_item(TOKEN_KEY, "abc").unwrap();
        assert_eq!(storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some("abc"));

        storage.set_item(TOKEN_KEY, "def").unwrap();
        assert_eq!(storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some("def"));

        storage.remove_item(TOKEN_KEY).unwrap();
        assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_memory_storage_remove_missing_is_ok() {
        let storage = MemoryStorage::with_item(CART_KEY, "[]");
        storage.remove_item(TOKEN_KEY).unwrap();
        assert_eq!(storage.get_item(CART_KEY).unwrap().as_deref(), Some("[]"));
    }
}
