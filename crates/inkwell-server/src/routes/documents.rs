//! Document routes: listing, viewing, creating, editing, and deleting.
//!
//! Viewing and listing are public. Everything that changes the document
//! root takes [`SignedIn`], so a signed-out request is turned away before
//! the handler runs.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use tracing::debug;

use inkwell_core::error::DocumentError;
use inkwell_core::render::{Rendered, render};

use super::{redirect_home, render_page};
use crate::error::AppError;
use crate::reply::Reply;
use crate::session::{Session, SignedIn};
use crate::state::AppState;
use crate::views;

/// Inline message for a missing or unknown extension.
pub const EXTENSION_REQUIRED: &str = "You must add an extension: .md or .txt";

/// Build the document router.
///
/// Static paths win over `/{name}`, so `new`, `delete` and `users` are
/// never looked up as documents.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/new", get(new_form).post(create))
        .route("/delete/{name}", post(delete))
        .route("/{name}", get(show).post(update))
        .route("/{name}/edit", get(edit_form))
}

// ── Forms ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NewDocumentForm {
    #[serde(default)]
    pub new_filename: String,
}

#[derive(Debug, Deserialize)]
pub struct EditDocumentForm {
    #[serde(default)]
    pub content: String,
}

// ── Handlers ─────────────────────────────────────────────────────────

async fn index(
    State(state): State<Arc<AppState>>,
    mut session: Session,
) -> Result<(Session, Reply), AppError> {
    let documents = state.documents.list().await?;
    let body = views::index(&documents, session.user());
    let html = render_page(&mut session, "Documents", &body);
    Ok((session, Reply::page(html)))
}

async fn new_form(SignedIn { mut session, .. }: SignedIn) -> (Session, Reply) {
    let html = render_page(&mut session, "New Document", &views::new_document(""));
    (session, Reply::page(html))
}

async fn create(
    State(state): State<Arc<AppState>>,
    SignedIn { mut session, .. }: SignedIn,
    Form(form): Form<NewDocumentForm>,
) -> Result<(Session, Reply), AppError> {
    let err = match state.documents.create(&form.new_filename).await {
        Ok(name) => return Ok(redirect_home(session, format!("{name} was created."))),
        Err(err) => err,
    };

    let message = match &err {
        DocumentError::EmptyName => "A name is required.".to_owned(),
        DocumentError::AlreadyExists { .. } => "File already exists.".to_owned(),
        DocumentError::InvalidName { .. } | DocumentError::MissingExtension { .. } => {
            invalid_name_message(&err)
        }
        DocumentError::NotFound { .. } | DocumentError::Storage(_) => return Err(err.into()),
    };
    debug!(error = %err, "document creation rejected");

    session.flash(message);
    let body = views::new_document(form.new_filename.trim());
    let html = render_page(&mut session, "New Document", &body);
    Ok((session, Reply::unprocessable(html)))
}

async fn show(
    State(state): State<Arc<AppState>>,
    mut session: Session,
    Path(name): Path<String>,
) -> Result<(Session, Reply), AppError> {
    let document = match state.documents.read(&name).await {
        Ok(document) => document,
        Err(DocumentError::NotFound { .. }) => {
            return Ok(redirect_home(session, format!("{name} does not exist.")));
        }
        Err(err) => return Err(err.into()),
    };

    match render(&document) {
        // Plain text leaves any pending flash for the next HTML page.
        Ok(Rendered::PlainText(text)) => Ok((session, Reply::PlainText(text))),
        Ok(Rendered::Html(fragment)) => {
            let html = render_page(&mut session, &name, &views::markdown(&name, &fragment));
            Ok((session, Reply::page(html)))
        }
        Err(err) => {
            debug!(error = %err, "document cannot be displayed");
            Ok(redirect_home(session, format!("{name} cannot be displayed.")))
        }
    }
}

async fn edit_form(
    State(state): State<Arc<AppState>>,
    SignedIn { mut session, .. }: SignedIn,
    Path(name): Path<String>,
) -> Result<(Session, Reply), AppError> {
    let document = match state.documents.read(&name).await {
        Ok(document) => document,
        Err(DocumentError::NotFound { .. }) => {
            return Ok(redirect_home(session, format!("{name} does not exist.")));
        }
        Err(err) => return Err(err.into()),
    };

    let body = views::edit_document(&name, &document.text());
    let html = render_page(&mut session, &format!("Edit {name}"), &body);
    Ok((session, Reply::page(html)))
}

async fn update(
    State(state): State<Arc<AppState>>,
    SignedIn { mut session, .. }: SignedIn,
    Path(name): Path<String>,
    Form(form): Form<EditDocumentForm>,
) -> Result<(Session, Reply), AppError> {
    match state.documents.write(&name, form.content.as_bytes()).await {
        Ok(()) => Ok(redirect_home(session, format!("{name} has been updated"))),
        Err(err @ (DocumentError::InvalidName { .. } | DocumentError::MissingExtension { .. })) => {
            debug!(error = %err, "document update rejected");
            session.flash(invalid_name_message(&err));
            let body = views::edit_document(&name, &form.content);
            let html = render_page(&mut session, &format!("Edit {name}"), &body);
            Ok((session, Reply::unprocessable(html)))
        }
        Err(err) => Err(err.into()),
    }
}

async fn delete(
    State(state): State<Arc<AppState>>,
    SignedIn { session, .. }: SignedIn,
    Path(name): Path<String>,
) -> Result<(Session, Reply), AppError> {
    match state.documents.delete(&name).await {
        Ok(()) => Ok(redirect_home(session, format!("{name} was deleted."))),
        Err(DocumentError::NotFound { .. }) => {
            Ok(redirect_home(session, format!("{name} does not exist.")))
        }
        Err(err) => Err(err.into()),
    }
}

fn invalid_name_message(err: &DocumentError) -> String {
    match err {
        DocumentError::InvalidName { name, .. } => format!("{name} is not a valid document name."),
        _ => EXTENSION_REQUIRED.to_owned(),
    }
}
