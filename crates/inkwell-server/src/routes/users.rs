//! Sign-in and sign-out routes under `/users`.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use tower::limit::ConcurrencyLimitLayer;
use tracing::{info, warn};

use super::{redirect_home, render_page};
use crate::error::AppError;
use crate::reply::Reply;
use crate::session::Session;
use crate::state::AppState;
use crate::views;

/// Concurrent sign-in attempts allowed at once; each one costs a bcrypt verify.
const SIGN_IN_CONCURRENCY: usize = 16;

/// Build the `/users` router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/signin", get(sign_in_form).post(sign_in))
        .layer(ConcurrencyLimitLayer::new(SIGN_IN_CONCURRENCY))
        .route("/users/signout", post(sign_out))
}

#[derive(Debug, Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

async fn sign_in_form(mut session: Session) -> (Session, Reply) {
    let html = render_page(&mut session, "Sign In", &views::sign_in(""));
    (session, Reply::page(html))
}

async fn sign_in(
    State(state): State<Arc<AppState>>,
    mut session: Session,
    Form(form): Form<SignInForm>,
) -> Result<(Session, Reply), AppError> {
    if state
        .credentials
        .verify(&form.username, &form.password)
        .await?
    {
        info!(username = %form.username, "user signed in");
        session.sign_in(form.username);
        return Ok(redirect_home(session, "Welcome!"));
    }

    warn!(username = %form.username, "sign-in failed");
    session.flash("Invalid credentials");
    let html = render_page(&mut session, "Sign In", &views::sign_in(&form.username));
    Ok((session, Reply::unprocessable(html)))
}

async fn sign_out(mut session: Session) -> (Session, Reply) {
    if let Some(username) = session.user() {
        info!(username, "user signed out");
    }
    session.sign_out();
    redirect_home(session, "You have been signed out.")
}
