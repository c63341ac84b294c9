use anyhow::{Context, Result};
use log::debug;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::Storage;
use crate::runtime::Runtime;

/// Storage persisted as a single JSON object on disk.
///
/// Every call reads the file again and writes it back whole. There is no
/// locking: two processes adding to the cart at once can lose an entry.
pub struct FileStorage<R: Runtime> {
    runtime: R,
    path: PathBuf,
}

impl<R: Runtime> FileStorage<R> {
    pub fn new(runtime: R, path: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.runtime.exists(&self.path) {
            return Ok(BTreeMap::new());
        }

        let text = self.runtime.read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&text)
            .with_context(|| format!("Malformed storage file {}", self.path.display()))
    }

    fn save(&self, items: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !self.runtime.exists(parent)
        {
            self.runtime.create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(items)?;
        self.runtime.write(&self.path, json.as_bytes())
    }
}

impl<R: Runtime> Storage for FileStorage<R> {
    #[tracing::instrument(skip(self))]
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    #[tracing::instrument(skip(self, value))]
    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.load()?;
        items.insert(key.to_string(), value.to_string());
        debug!("Storing '{}' in {}", key, self.path.display());
        self.save(&items)
    }

    #[tracing::instrument(skip(self))]
    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.load()?;
        if items.remove(key).is_none() {
            return Ok(());
        }
        debug!("Removing '{}' from {}", key, self.path.display());
        self.save(&items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use crate::storage::{CART_KEY, TOKEN_KEY};
    use mockall::predicate::eq;
    use tempfile::tempdir;

    #[test]
    fn test_file_storage_roundtrip_on_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/storage.json");
        let storage = FileStorage::new(RealRuntime, &path);

        assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);

        storage.set_item(TOKEN_KEY, "jwt-value").unwrap();
        storage.set_item(CART_KEY, "[]").unwrap();
        assert!(path.exists());

        // A second handle sees the same state.
        let other = FileStorage::new(RealRuntime, &path);
        assert_eq!(
            other.get_item(TOKEN_KEY).unwrap().as_deref(),
            Some("jwt-value")
        );

        other.remove_item(TOKEN_KEY).unwrap();
        assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get_item(CART_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_storage_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{not json").unwrap();

        let storage = FileStorage::new(RealRuntime, &path);
        let err = storage.get_item(TOKEN_KEY).unwrap_err();
        assert!(format!("{:#}", err).contains("Malformed storage file"));
    }

    #[test]
    fn test_file_storage_empty_file_is_empty() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_to_string()
            .returning(|_| Ok("  \n".to_string()));

        let storage = FileStorage::new(runtime, "/home/user/.config/storefront/storage.json");
        assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_storage_remove_missing_key_does_not_write() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_to_string()
            .returning(|_| Ok(r#"{"cart": "[]"}"#.to_string()));
        runtime.expect_write().never();

        let storage = FileStorage::new(runtime, "/home/user/.config/storefront/storage.json");
        storage.remove_item(TOKEN_KEY).unwrap();
    }

    #[test]
    fn test_file_storage_creates_parent_directory() {
        let path = PathBuf::from("/home/user/.config/storefront/storage.json");
        let parent = path.parent().unwrap().to_path_buf();

        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);
        runtime
            .expect_create_dir_all()
            .with(eq(parent))
            .times(1)
            .returning(|_| Ok(()));
        runtime
            .expect_write()
            .withf(|_, contents| {
                String::from_utf8_lossy(contents).contains(r#""token": "abc""#)
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let storage = FileStorage::new(runtime, &path);
        storage.set_item(TOKEN_KEY, "abc").unwrap();
    }
}
