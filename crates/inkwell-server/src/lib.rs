//! Inkwell HTTP server.
//!
//! Wires the document store, credential store, and signed-cookie sessions
//! into an Axum router serving the document listing, viewer, editor, and
//! sign-in pages.

pub mod config;
pub mod error;
pub mod reply;
pub mod routes;
pub mod session;
pub mod state;
pub mod views;
