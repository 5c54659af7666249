//! In-memory storage backend for testing.
//!
//! This backend stores all data in a `BTreeMap` behind a `RwLock`. It is not
//! persistent: all data is lost when the process exits. Use this for unit
//! tests and integration tests where you need a real storage backend without
//! touching disk.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{StorageBackend, StorageError, validate_key};

/// An in-memory storage backend backed by a `BTreeMap`.
///
/// Thread-safe and async-compatible. Keys are kept sorted, so listing
/// needs no extra sort. Applies the same key rules as [`crate::FsBackend`].
///
/// # Examples
///
/// ```
/// # use inkwell_storage::{MemoryBackend, StorageBackend};
/// # #[tokio::main]
/// # async fn main() {
/// let backend = MemoryBackend::new();
/// backend.put("about.md", b"# About").await.unwrap();
/// let val = backend.get("about.md").await.unwrap();
/// assert_eq!(val, Some(b"# About".to_vec()));
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    data: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryBackend {
    /// Create a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl StorageBackend for MemoryBackend {
    async fn list(&self) -> Result<Vec<String>, StorageError> {
        let data = self.data.read().await;
        Ok(data.keys().cloned().collect())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        validate_key(key)?;
        let data = self.data.read().await;
        Ok(data.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut data = self.data.write().await;
        data.insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    async fn create(&self, key: &str) -> Result<bool, StorageError> {
        validate_key(key)?;
        let mut data = self.data.write().await;
        match data.entry(key.to_owned()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(Vec::new());
                Ok(true)
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        validate_key(key)?;
        let mut data = self.data.write().await;
        Ok(data.remove(key).is_some())
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        validate_key(key)?;
        let data = self.data.read().await;
        Ok(data.contains_key(key))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_nonexistent_returns_none() {
        let backend = MemoryBackend::new();
        let result = backend.get("missing.txt").await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn put_overwrites_existing() {
        let backend = MemoryBackend::new();
        backend.put("notes.txt", b"v1").await.unwrap();
        backend.put("notes.txt", b"v2").await.unwrap();
        let val = backend.get("notes.txt").await.unwrap();
        assert_eq!(val, Some(b"v2".to_vec()));
    }

    #[tokio::test]
    async fn create_does_not_clobber() {
        let backend = MemoryBackend::new();
        backend.put("notes.txt", b"keep me").await.unwrap();
        assert!(!backend.create("notes.txt").await.unwrap());
        assert_eq!(
            backend.get("notes.txt").await.unwrap(),
            Some(b"keep me".to_vec())
        );
    }

    #[tokio::test]
    async fn delete_nonexistent_reports_false() {
        let backend = MemoryBackend::new();
        assert!(!backend.delete("nope.md").await.unwrap());
    }

    #[tokio::test]
    async fn list_returns_sorted_keys() {
        let backend = MemoryBackend::new();
        backend.put("b.md", b"2").await.unwrap();
        backend.put("a.txt", b"1").await.unwrap();
        let keys = backend.list().await.unwrap();
        assert_eq!(keys, vec!["a.txt", "b.md"]);
    }

    #[tokio::test]
    async fn rejects_unsafe_keys() {
        let backend = MemoryBackend::new();
        assert!(matches!(
            backend.put("../escape.txt", b"x").await,
            Err(StorageError::InvalidKey { .. })
        ));
    }

    #[tokio::test]
    async fn clone_shares_state() {
        let backend = MemoryBackend::new();
        let clone = backend.clone();
        backend.put("shared.txt", b"val").await.unwrap();
        let val = clone.get("shared.txt").await.unwrap();
        assert_eq!(val, Some(b"val".to_vec()));
    }
}
