//! Core library for Inkwell.
//!
//! Contains the document store (name validation and kind detection on top
//! of a storage backend), the content renderer that turns Markdown into
//! HTML, and the credential store that checks passwords against bcrypt
//! hashes kept in a YAML file. This crate depends on `inkwell-storage` for
//! the backend trait and knows nothing about HTTP or sessions.

pub mod credentials;
pub mod document;
pub mod error;
pub mod render;
