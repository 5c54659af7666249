//! Error types for `inkwell-core`.
//!
//! Each error variant carries enough context to diagnose the problem without
//! a debugger. Credential errors never include password hashes, only the
//! path of the credential file or the offending username.

use inkwell_storage::StorageError;

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The requested name was empty or only whitespace.
    #[error("document name is empty")]
    EmptyName,

    /// The name cannot be used as a filename under the document root.
    #[error("invalid document name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// The name has no `.txt` or `.md` extension.
    #[error("document name '{name}' has no .txt or .md extension")]
    MissingExtension { name: String },

    /// A document with this name already exists.
    #[error("document already exists: {name}")]
    AlreadyExists { name: String },

    /// No document with this name exists.
    #[error("document not found: {name}")]
    NotFound { name: String },

    /// The underlying storage backend returned an error.
    #[error("document storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors from the content renderer.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The document's extension maps to no known kind.
    #[error("cannot render '{name}': unsupported extension {extension:?}")]
    UnsupportedKind {
        name: String,
        extension: Option<String>,
    },
}

/// Errors from loading or saving the credential file.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// The credential file could not be read.
    #[error("failed to read credentials from '{path}': {reason}")]
    Read { path: String, reason: String },

    /// The credential file could not be written.
    #[error("failed to write credentials to '{path}': {reason}")]
    Write { path: String, reason: String },

    /// The credential file is not a `username: hash` mapping.
    #[error("malformed credentials file '{path}': {reason}")]
    Parse { path: String, reason: String },

    /// Hashing a new password failed.
    #[error("password hashing failed: {reason}")]
    Hash { reason: String },

    /// The blocking verification task did not complete.
    #[error("password verification task failed: {reason}")]
    Task { reason: String },
}
