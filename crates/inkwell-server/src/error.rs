//! HTTP error types for the Inkwell server.
//!
//! Domain failures are handled inside the handlers (flash + redirect, or a
//! 422 form). What reaches [`AppError`] is whatever a handler cannot
//! recover from: storage and credential-file I/O failures. They render as
//! a 500 HTML error page.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use inkwell_core::error::{CredentialError, DocumentError};

use crate::views;

/// Application-level error returned from HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Internal server error. The message is logged, never shown.
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let Self::Internal(msg) = self;
        tracing::error!(error = %msg, "request failed");

        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let body = views::error(status.as_u16(), "internal server error");
        (status, Html(views::layout("Error", None, &body))).into_response()
    }
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        Self::Internal(err.to_string())
    }
}
