//! Credential store backed by a YAML file of bcrypt hashes.
//!
//! The file is a flat mapping:
//!
//! ```yaml
//! admin: $2b$12$...
//! ```
//!
//! The web application never writes this file; it is re-read on every
//! sign-in attempt so edits made with the admin CLI apply immediately.
//! bcrypt is deliberately slow, so verification runs on the blocking pool.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::CredentialError;

pub use bcrypt::DEFAULT_COST;

/// Username → bcrypt hash, sorted by username.
pub type Credentials = BTreeMap<String, String>;

/// Loads credentials from disk and checks passwords against them.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Create a store reading from the given YAML file.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing YAML file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the credential file.
    ///
    /// An empty file is an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Read`] if the file cannot be read, or
    /// [`CredentialError::Parse`] if it is not a string-to-string mapping.
    pub async fn load(&self) -> Result<Credentials, CredentialError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CredentialError::Read {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;

        if raw.trim().is_empty() {
            return Ok(Credentials::new());
        }

        serde_yaml::from_str(&raw).map_err(|e| CredentialError::Parse {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Like [`load`](Self::load), but a missing file is an empty mapping.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load) for every failure other than "not found".
    pub async fn load_or_default(&self) -> Result<Credentials, CredentialError> {
        match tokio::fs::metadata(&self.path).await {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Credentials::new()),
            _ => self.load().await,
        }
    }

    /// Write the mapping back to disk, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Write`] if serialization or the write fails.
    pub async fn save(&self, credentials: &Credentials) -> Result<(), CredentialError> {
        let write_err = |reason: String| CredentialError::Write {
            path: self.path.display().to_string(),
            reason,
        };

        let yaml = serde_yaml::to_string(credentials).map_err(|e| write_err(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| write_err(e.to_string()))?;
        }
        tokio::fs::write(&self.path, yaml)
            .await
            .map_err(|e| write_err(e.to_string()))
    }

    /// Check a username and password.
    ///
    /// Returns `Ok(false)` for an unknown username, a wrong password, or a
    /// stored hash bcrypt cannot parse.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Read`] or [`CredentialError::Parse`] if the
    /// credential file cannot be loaded, or [`CredentialError::Task`] if the
    /// verification task is cancelled.
    pub async fn verify(&self, username: &str, password: &str) -> Result<bool, CredentialError> {
        let credentials = self.load().await?;
        let Some(hash) = credentials.get(username).cloned() else {
            debug!(username, "sign-in attempt for unknown user");
            return Ok(false);
        };

        let password = password.to_owned();
        let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| CredentialError::Task {
                reason: e.to_string(),
            })?;

        match outcome {
            Ok(matched) => Ok(matched),
            Err(e) => {
                warn!(username, error = %e, "stored password hash is malformed");
                Ok(false)
            }
        }
    }
}

/// Hash a password with bcrypt at the given cost (4..=31).
///
/// # Errors
///
/// Returns [`CredentialError::Hash`] if the cost is out of range.
pub fn hash_password(password: &str, cost: u32) -> Result<String, CredentialError> {
    bcrypt::hash(password, cost).map_err(|e| CredentialError::Hash {
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn store_with(entries: &[(&str, &str)]) -> (tempfile::TempDir, CredentialStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("users.yml"));
        let mut creds = Credentials::new();
        for (user, password) in entries {
            creds.insert((*user).to_owned(), hash_password(password, 4).unwrap());
        }
        store.save(&creds).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn verify_accepts_matching_password() {
        let (_dir, store) = store_with(&[("admin", "secret")]).await;
        assert!(store.verify("admin", "secret").await.unwrap());
    }

    #[tokio::test]
    async fn verify_rejects_wrong_password_and_unknown_user() {
        let (_dir, store) = store_with(&[("admin", "secret")]).await;
        assert!(!store.verify("admin", "Secret").await.unwrap());
        assert!(!store.verify("nobody", "secret").await.unwrap());
    }

    #[tokio::test]
    async fn verify_rereads_file_on_every_call() {
        let (_dir, store) = store_with(&[("admin", "secret")]).await;
        assert!(!store.verify("editor", "pencil").await.unwrap());

        let mut creds = store.load().await.unwrap();
        creds.insert("editor".to_owned(), hash_password("pencil", 4).unwrap());
        store.save(&creds).await.unwrap();

        assert!(store.verify("editor", "pencil").await.unwrap());
    }

    #[tokio::test]
    async fn malformed_hash_is_a_failed_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.yml");
        tokio::fs::write(&path, "admin: not-a-bcrypt-hash\n").await.unwrap();
        let store = CredentialStore::new(&path);
        assert!(!store.verify("admin", "secret").await.unwrap());
    }

    #[tokio::test]
    async fn missing_file_is_an_error_for_verify() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("absent.yml"));
        assert!(matches!(
            store.verify("admin", "secret").await,
            Err(CredentialError::Read { .. })
        ));
        assert!(store.load_or_default().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_mapping_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.yml");
        tokio::fs::write(&path, "- just\n- a list\n").await.unwrap();
        assert!(matches!(
            CredentialStore::new(&path).load().await,
            Err(CredentialError::Parse { .. })
        ));
    }

    #[test]
    fn hash_password_rejects_invalid_cost() {
        assert!(matches!(
            hash_password("secret", 2),
            Err(CredentialError::Hash { .. })
        ));
    }
}
