//! Shared application state for the Inkwell server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`. It holds the document store, the credential
//! store, and the key that signs session cookies.

use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};

use inkwell_core::credentials::CredentialStore;
use inkwell_core::document::DocumentStore;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Document list/read/create/write/delete.
    pub documents: DocumentStore,
    /// Username/password verification.
    pub credentials: CredentialStore,
    /// Signing key for the session cookie.
    pub cookie_key: Key,
}

impl AppState {
    /// Assemble the state from its parts.
    #[must_use]
    pub fn new(documents: DocumentStore, credentials: CredentialStore, cookie_key: Key) -> Self {
        Self {
            documents,
            credentials,
            cookie_key,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("credentials", &self.credentials.path())
            .finish_non_exhaustive()
    }
}

/// Derive the cookie signing key from a secret of any length.
///
/// SHA-512 yields exactly the 64 bytes of master key material the cookie
/// crate expects, so short secrets are stretched and long ones folded.
#[must_use]
pub fn derive_cookie_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}
