//! Persistence backends for the store document.
//!
//! A backend is a plain key/value store of strings: no transactions and no
//! expiry. [`InMemoryStore`] keeps entries in a shared map; [`FileStore`]
//! writes one `<key>.json` file per key.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use schemaform_core::{FormError, FormResult};

/// A string key/value store holding serialized store documents.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> FormResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> FormResult<()>;

    /// Removes `key`. Returns `true` if it existed.
    async fn remove(&self, key: &str) -> FormResult<bool>;
}

#[async_trait]
impl<T: StoreBackend + ?Sized> StoreBackend for Arc<T> {
    async fn get(&self, key: &str) -> FormResult<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: String) -> FormResult<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> FormResult<bool> {
        (**self).remove(key).await
    }
}

/// A thread-safe in-memory backend.
///
/// Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every entry.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Returns the number of entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns `true` if the store holds no entry.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn get(&self, key: &str) -> FormResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> FormResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> FormResult<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }
}

/// A backend that keeps each key in `<dir>/<key>.json`.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// reader never sees a half-written document.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// The directory holding the store files.
    pub dir: PathBuf,
}

impl FileStore {
    /// Creates a file store rooted at `dir`. The directory is created on the
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory holding the store files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> FormResult<PathBuf> {
        if key.is_empty() || key.starts_with('.') || key.contains(['/', '\\']) {
            return Err(FormError::StorageError(format!("Invalid store key '{key}'")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl StoreBackend for FileStore {
    async fn get(&self, key: &str) -> FormResult<Option<String>> {
        let path = self.key_path(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FormError::Io(e)),
        }
    }

    async fn set(&self, key: &str, value: String) -> FormResult<()> {
        let path = self.key_path(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        tokio::fs::write(&tmp, value.as_bytes()).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> FormResult<bool> {
        let path = self.key_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(FormError::Io(e)),
        }
    }
}
