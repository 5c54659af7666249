//! Typed handler replies.
//!
//! Every handler ends by producing exactly one [`Reply`]. Returning it ends
//! the handler, so a redirect can never be followed by more work.

use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};

/// What a handler wants sent back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A full HTML page.
    Rendered { status: StatusCode, html: String },
    /// Raw text served as `text/plain`.
    PlainText(String),
    /// `302 Found` to another path.
    Redirect(String),
}

impl Reply {
    /// `200 OK` page.
    #[must_use]
    pub fn page(html: String) -> Self {
        Self::Rendered {
            status: StatusCode::OK,
            html,
        }
    }

    /// `422 Unprocessable Entity` page, used when a form is re-rendered with an error.
    #[must_use]
    pub fn unprocessable(html: String) -> Self {
        Self::Rendered {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            html,
        }
    }

    /// `302 Found` redirect.
    #[must_use]
    pub fn redirect(to: impl Into<String>) -> Self {
        Self::Redirect(to.into())
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Self::Rendered { status, html } => (status, Html(html)).into_response(),
            Self::PlainText(text) => (
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                text,
            )
                .into_response(),
            Self::Redirect(to) => (StatusCode::FOUND, [(header::LOCATION, to)]).into_response(),
        }
    }
}
