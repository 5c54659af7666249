//! Document store.
//!
//! Documents are flat files keyed by filename. A document's kind is derived
//! only from its extension: `.txt` is plain text, `.md` is Markdown. The
//! store validates names before they reach the storage backend and turns
//! backend outcomes into [`DocumentError`] variants the HTTP layer can
//! report to the user.

use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use inkwell_storage::{StorageBackend, StorageError, validate_key};
use tracing::info;

use crate::error::DocumentError;

/// Classification of a document, derived from its filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// `.txt`: served verbatim.
    PlainText,
    /// `.md`: rendered to HTML.
    Markdown,
}

impl DocumentKind {
    /// Map a bare extension (without the dot) to a kind.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "txt" => Some(Self::PlainText),
            "md" => Some(Self::Markdown),
            _ => None,
        }
    }

    /// Derive the kind of a filename.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        extension_of(name).and_then(Self::from_extension)
    }
}

/// Extension of a filename without the leading dot, if it has one.
#[must_use]
pub fn extension_of(name: &str) -> Option<&str> {
    Path::new(name).extension().and_then(|ext| ext.to_str())
}

/// A document loaded from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Filename, including extension.
    pub name: String,
    /// Raw file contents.
    pub content: Vec<u8>,
}

impl Document {
    /// Extension of the document's filename without the dot.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        extension_of(&self.name)
    }

    /// Kind derived from the extension, if recognized.
    #[must_use]
    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::from_name(&self.name)
    }

    /// Contents as text. Invalid UTF-8 sequences are replaced.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

/// List, read, create, write, and delete documents through a storage backend.
///
/// Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct DocumentStore {
    backend: Arc<dyn StorageBackend>,
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore").finish_non_exhaustive()
    }
}

impl DocumentStore {
    /// Create a document store over the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Names of every document in the root, sorted ascending.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Storage`] if the backend cannot be listed.
    pub async fn list(&self) -> Result<Vec<String>, DocumentError> {
        Ok(self.backend.list().await?)
    }

    /// Load a document by name.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if no such file exists (names
    /// that cannot exist under the root count as missing), or
    /// [`DocumentError::Storage`] if the read fails.
    pub async fn read(&self, name: &str) -> Result<Document, DocumentError> {
        match self.backend.get(name).await {
            Ok(Some(content)) => Ok(Document {
                name: name.to_owned(),
                content,
            }),
            Ok(None) | Err(StorageError::InvalidKey { .. }) => Err(DocumentError::NotFound {
                name: name.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether a document with this name exists.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Storage`] if the backend check fails.
    pub async fn exists(&self, name: &str) -> Result<bool, DocumentError> {
        match self.backend.exists(name).await {
            Ok(found) => Ok(found),
            Err(StorageError::InvalidKey { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Create an empty document and return its (trimmed) name.
    ///
    /// Checks run in a fixed order and the first failure wins: empty name,
    /// unusable filename, already exists, missing `.txt`/`.md` extension.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::EmptyName`], [`DocumentError::InvalidName`],
    /// [`DocumentError::AlreadyExists`], [`DocumentError::MissingExtension`],
    /// or [`DocumentError::Storage`] if the backend fails.
    pub async fn create(&self, raw_name: &str) -> Result<String, DocumentError> {
        let name = raw_name.trim();
        if name.is_empty() {
            return Err(DocumentError::EmptyName);
        }
        check_key(name)?;

        if self.backend.exists(name).await? {
            return Err(DocumentError::AlreadyExists {
                name: name.to_owned(),
            });
        }

        if DocumentKind::from_name(name).is_none() {
            return Err(DocumentError::MissingExtension {
                name: name.to_owned(),
            });
        }

        // Another request may have created it since the existence check.
        if !self.backend.create(name).await? {
            return Err(DocumentError::AlreadyExists {
                name: name.to_owned(),
            });
        }

        info!(name, "document created");
        Ok(name.to_owned())
    }

    /// Replace a document's content wholesale, creating it if absent.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidName`] or
    /// [`DocumentError::MissingExtension`] for a name that could not have
    /// been created, or [`DocumentError::Storage`] if the write fails.
    pub async fn write(&self, name: &str, content: &[u8]) -> Result<(), DocumentError> {
        check_key(name)?;
        if DocumentKind::from_name(name).is_none() {
            return Err(DocumentError::MissingExtension {
                name: name.to_owned(),
            });
        }

        self.backend.put(name, content).await?;
        info!(name, bytes = content.len(), "document updated");
        Ok(())
    }

    /// Delete a document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if no such file exists, or
    /// [`DocumentError::Storage`] if the delete fails.
    pub async fn delete(&self, name: &str) -> Result<(), DocumentError> {
        match self.backend.delete(name).await {
            Ok(true) => {
                info!(name, "document deleted");
                Ok(())
            }
            Ok(false) | Err(StorageError::InvalidKey { .. }) => Err(DocumentError::NotFound {
                name: name.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

fn check_key(name: &str) -> Result<(), DocumentError> {
    validate_key(name).map_err(|e| match e {
        StorageError::InvalidKey { reason, .. } => DocumentError::InvalidName {
            name: name.to_owned(),
            reason,
        },
        other => DocumentError::Storage(other),
    })
}
