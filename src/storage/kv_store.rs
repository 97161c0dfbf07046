use std::{
    collections::HashMap,
    io,
    ops::Deref,
    path::PathBuf,
    sync::Mutex,
};

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::{
    error::{TrackerError, TrackerResult},
    fs::operations::{read_locked, rewrite_locked},
};

/// Interface for abstracting a synchronous-per-action key-value store, the local equivalent of a
/// browser's local storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value under `key`, or `None` if nothing was ever stored.
    async fn get(&self, key: &str) -> TrackerResult<Option<String>>;

    /// Overwrites whatever was stored under `key`.
    async fn set(&self, key: &str, value: &str) -> TrackerResult<()>;
}

#[async_trait]
impl<T> KeyValueStore for T
where
    T: Deref + Send + Sync,
    T::Target: KeyValueStore,
{
    async fn get(&self, key: &str) -> TrackerResult<Option<String>> {
        self.deref().get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> TrackerResult<()> {
        self.deref().set(key, value).await
    }
}

/// Keys end up as file names, so only a conservative character set is allowed.
fn validate_key(key: &str) -> TrackerResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(TrackerError::storage(
            key,
            io::Error::new(io::ErrorKind::InvalidInput, "invalid storage key"),
        ))
    }
}

/// The main realization of [KeyValueStore]. Every key is kept in its own `<key>.json` file.
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: PathBuf) -> Result<Self, io::Error> {
        std::fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> TrackerResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> TrackerResult<Option<String>> {
        let path = self.path_for(key)?;
        debug!("Reading {path:?}");
        read_locked(&path)
            .await
            .map_err(|e| TrackerError::storage(key, e))
    }

    async fn set(&self, key: &str, value: &str) -> TrackerResult<()> {
        let path = self.path_for(key)?;
        debug!("Rewriting {path:?} with {} bytes", value.len());
        rewrite_locked(&path, value.as_bytes())
            .await
            .map_err(|e| TrackerError::storage(key, e))
    }
}

/// Keeps values in memory only. Useful for embedding and tests.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_values<R>(
        &self,
        key: &str,
        action: impl FnOnce(&mut HashMap<String, String>) -> R,
    ) -> TrackerResult<R> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| TrackerError::storage(key, io::Error::other("store lock poisoned")))?;
        Ok(action(&mut values))
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> TrackerResult<Option<String>> {
        validate_key(key)?;
        self.with_values(key, |values| values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> TrackerResult<()> {
        validate_key(key)?;
        trace!("Setting {key} in memory");
        self.with_values(key, |values| {
            values.insert(key.to_owned(), value.to_owned());
        })
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use crate::error::TrackerError;

    use super::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};

    #[tokio::test]
    async fn test_file_store_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let store = FileKeyValueStore::new(dir.path().join("nested"))?;

        assert_eq!(store.get("progressEntries").await?, None);

        store.set("progressEntries", "[]").await?;
        assert_eq!(store.get("progressEntries").await?.as_deref(), Some("[]"));
        assert!(dir.path().join("nested/progressEntries.json").exists());

        store.set("progressEntries", "[1]").await?;
        assert_eq!(store.get("progressEntries").await?.as_deref(), Some("[1]"));
        Ok(())
    }

    #[tokio::test]
    async fn test_file_store_rejects_escaping_keys() -> Result<()> {
        let dir = tempdir()?;
        let store = FileKeyValueStore::new(dir.path().to_owned())?;

        for key in ["", "../outside", "a/b", "with space"] {
            assert!(matches!(
                store.set(key, "x").await,
                Err(TrackerError::Storage { .. })
            ));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_memory_store_through_reference() -> Result<()> {
        let store = MemoryKeyValueStore::new();
        let borrowed = &store;

        borrowed.set("key", "value").await?;
        assert_eq!(store.get("key").await?.as_deref(), Some("value"));
        assert_eq!(store.get("other").await?, None);
        Ok(())
    }
}
