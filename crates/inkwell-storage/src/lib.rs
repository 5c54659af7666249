//! Storage backend abstraction for Inkwell.
//!
//! This crate defines the [`StorageBackend`] trait: a flat key-value
//! interface where every key is a single document filename. It knows
//! nothing about document kinds, rendering, or sessions; the document
//! store in `inkwell-core` layers name validation on top of it.
//!
//! Two implementations are provided:
//!
//! - [`FsBackend`]: production default, one regular file per key under a root directory
//! - [`MemoryBackend`]: in-memory, for testing only

mod error;
mod fs_backend;
mod memory;

pub use error::StorageError;
pub use fs_backend::FsBackend;
pub use memory::MemoryBackend;

/// A pluggable flat storage backend.
///
/// Keys are bare filenames (e.g. `about.md`). A key never contains a path
/// separator; see [`validate_key`]. Values are raw file contents.
///
/// Implementations must be safe to share across async tasks (`Send + Sync`).
/// Operations are not synchronized with each other: two concurrent writes
/// to the same key race and the last one wins.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync + 'static {
    /// List every key in the store, sorted ascending.
    ///
    /// Only names that pass [`validate_key`] are listed, so every listed key
    /// can be read back with [`get`](StorageBackend::get).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::List`] if the underlying backend fails.
    async fn list(&self) -> Result<Vec<String>, StorageError>;

    /// Retrieve a value by key.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] for an unsafe key, or
    /// [`StorageError::Read`] if the underlying backend fails.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Store a value, creating the key or truncating an existing value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] for an unsafe key, or
    /// [`StorageError::Write`] if the underlying backend fails.
    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Create an empty value under `key` only if the key is absent.
    ///
    /// Returns `Ok(false)` without touching the store when the key already
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] for an unsafe key, or
    /// [`StorageError::Write`] if the underlying backend fails.
    async fn create(&self, key: &str) -> Result<bool, StorageError>;

    /// Delete a key.
    ///
    /// Returns `Ok(false)` if the key did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] for an unsafe key, or
    /// [`StorageError::Delete`] if the underlying backend fails.
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;

    /// Check whether a key exists in storage.
    ///
    /// The default implementation calls [`get`](StorageBackend::get) and checks
    /// for `Some`. Backends may override this with a more efficient check.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] if the underlying backend fails.
    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key).await?.is_some())
    }
}

/// Reject keys that could escape the storage root or name a hidden file.
///
/// A valid key is non-empty, has no `/`, `\` or NUL, and does not start
/// with `.` (which also rules out `.` and `..`).
///
/// # Errors
///
/// Returns [`StorageError::InvalidKey`] describing the first violation.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let reason = if key.is_empty() {
        "key is empty"
    } else if key.starts_with('.') {
        "key starts with '.'"
    } else if key.contains(['/', '\\']) {
        "key contains a path separator"
    } else if key.contains('\0') {
        "key contains a NUL byte"
    } else {
        return Ok(());
    };

    Err(StorageError::InvalidKey {
        key: key.to_owned(),
        reason: reason.to_owned(),
    })
}
