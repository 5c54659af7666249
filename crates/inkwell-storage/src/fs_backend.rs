//! Filesystem storage backend: the production default.
//!
//! Each key is a regular file directly under the root directory. All
//! operations go through `tokio::fs`, which offloads the blocking syscalls
//! to the Tokio blocking thread pool.
//!
//! Nothing here locks files. Two requests writing the same key race and the
//! last write wins; a delete may land between another request's existence
//! check and its read.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::{StorageBackend, StorageError, validate_key};

/// A storage backend backed by a directory of regular files.
///
/// # Examples
///
/// ```no_run
/// # use inkwell_storage::FsBackend;
/// let backend = FsBackend::open("./data").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    /// Open a storage root at the given path.
    ///
    /// Creates the directory (and its parents) if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the directory cannot be created or
    /// the path exists but is not a directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref();
        std::fs::create_dir_all(root).map_err(|e| StorageError::Open {
            path: root.display().to_string(),
            reason: e.to_string(),
        })?;

        if !root.is_dir() {
            return Err(StorageError::Open {
                path: root.display().to_string(),
                reason: "not a directory".to_owned(),
            });
        }

        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Return the root directory of this backend.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key to its file path, rejecting anything that would leave the root.
    fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

#[async_trait::async_trait]
impl StorageBackend for FsBackend {
    async fn list(&self) -> Result<Vec<String>, StorageError> {
        let list_err = |e: std::io::Error| StorageError::List {
            root: self.root.display().to_string(),
            reason: e.to_string(),
        };

        let mut entries = fs::read_dir(&self.root).await.map_err(list_err)?;
        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(list_err)? {
            if !entry.file_type().await.map_err(list_err)?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) if validate_key(&name).is_ok() => keys.push(name),
                Ok(name) => tracing::debug!(name = %name, "skipping file that is not a valid key"),
                Err(raw) => tracing::debug!(name = ?raw, "skipping non UTF-8 filename"),
            }
        }

        keys.sort();
        Ok(keys)
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.resolve(key)?;
        let read_err = |e: std::io::Error| StorageError::Read {
            key: key.to_owned(),
            reason: e.to_string(),
        };

        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(read_err(e)),
        }

        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            // Deleted between the metadata check and the read.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(read_err(e)),
        }
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let path = self.resolve(key)?;
        fs::write(&path, value)
            .await
            .map_err(|e| StorageError::Write {
                key: key.to_owned(),
                reason: e.to_string(),
            })
    }

    async fn create(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.resolve(key)?;
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(StorageError::Write {
                key: key.to_owned(),
                reason: e.to_string(),
            }),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.resolve(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Delete {
                key: key.to_owned(),
                reason: e.to_string(),
            }),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.resolve(key)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Read {
                key: key.to_owned(),
                reason: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn backend() -> (tempfile::TempDir, FsBackend) {
        let dir = tempfile::tempdir().unwrap();
        let backend = FsBackend::open(dir.path().join("data")).unwrap();
        (dir, backend)
    }

    #[tokio::test]
    async fn open_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested/data");
        let backend = FsBackend::open(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(backend.root(), root.as_path());
    }

    #[tokio::test]
    async fn open_rejects_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain");
        std::fs::write(&file, b"x").unwrap();
        assert!(matches!(
            FsBackend::open(&file),
            Err(StorageError::Open { .. })
        ));
    }

    #[tokio::test]
    async fn list_is_sorted_and_skips_directories() {
        let (_dir, backend) = backend();
        backend.put("changes.txt", b"").await.unwrap();
        backend.put("about.md", b"").await.unwrap();
        std::fs::create_dir(backend.root().join("drafts")).unwrap();

        let keys = backend.list().await.unwrap();
        assert_eq!(keys, vec!["about.md", "changes.txt"]);
    }

    #[tokio::test]
    async fn list_only_returns_readable_keys() {
        let (_dir, backend) = backend();
        backend.put("about.md", b"# About").await.unwrap();
        std::fs::write(backend.root().join(".hidden.md"), b"# Hidden").unwrap();

        let keys = backend.list().await.unwrap();
        assert_eq!(keys, vec!["about.md"]);
        for key in &keys {
            assert!(backend.get(key).await.unwrap().is_some());
        }
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let (_dir, backend) = backend();
        assert_eq!(backend.get("nope.txt").await.unwrap(), None);
    }

    #[tokio::test]
    async fn get_directory_returns_none() {
        let (_dir, backend) = backend();
        std::fs::create_dir(backend.root().join("folder.md")).unwrap();
        assert_eq!(backend.get("folder.md").await.unwrap(), None);
        assert!(!backend.exists("folder.md").await.unwrap());
    }

    #[tokio::test]
    async fn put_truncates_existing_content() {
        let (_dir, backend) = backend();
        backend.put("notes.txt", b"a much longer first version").await.unwrap();
        backend.put("notes.txt", b"short").await.unwrap();
        assert_eq!(
            backend.get("notes.txt").await.unwrap(),
            Some(b"short".to_vec())
        );
    }

    #[tokio::test]
    async fn create_only_when_absent() {
        let (_dir, backend) = backend();
        assert!(backend.create("new.md").await.unwrap());
        assert_eq!(backend.get("new.md").await.unwrap(), Some(Vec::new()));

        backend.put("new.md", b"kept").await.unwrap();
        assert!(!backend.create("new.md").await.unwrap());
        assert_eq!(backend.get("new.md").await.unwrap(), Some(b"kept".to_vec()));
    }

    #[tokio::test]
    async fn delete_reports_whether_file_existed() {
        let (_dir, backend) = backend();
        backend.put("gone.txt", b"bye").await.unwrap();
        assert!(backend.delete("gone.txt").await.unwrap());
        assert!(!backend.delete("gone.txt").await.unwrap());
        assert!(!backend.exists("gone.txt").await.unwrap());
    }

    #[tokio::test]
    async fn traversal_keys_never_touch_disk() {
        let (dir, backend) = backend();
        std::fs::write(dir.path().join("secret.txt"), b"outside").unwrap();

        assert!(matches!(
            backend.get("../secret.txt").await,
            Err(StorageError::InvalidKey { .. })
        ));
        assert!(matches!(
            backend.delete("../secret.txt").await,
            Err(StorageError::InvalidKey { .. })
        ));
        assert!(dir.path().join("secret.txt").exists());
    }
}
