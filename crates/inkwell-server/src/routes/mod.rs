//! HTTP route table.
//!
//! | Method | Path | Signed in |
//! |---|---|---|
//! | GET | `/` | no |
//! | GET, POST | `/new` | yes |
//! | POST | `/delete/{name}` | yes |
//! | GET | `/{name}` | no |
//! | POST | `/{name}` | yes |
//! | GET | `/{name}/edit` | yes |
//! | GET, POST | `/users/signin` | no |
//! | POST | `/users/signout` | no |

pub mod documents;
pub mod users;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, header};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::reply::Reply;
use crate::session::Session;
use crate::state::AppState;
use crate::views;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(documents::router())
        .merge(users::router())
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .with_state(state)
}

/// Lay out a page, consuming the session's pending flash.
fn render_page(session: &mut Session, title: &str, body: &str) -> String {
    let flash = session.take_flash();
    views::layout(title, flash.as_deref(), body)
}

/// Flash `message` and send the browser back to the listing.
fn redirect_home(mut session: Session, message: impl Into<String>) -> (Session, Reply) {
    session.flash(message);
    (session, Reply::redirect("/"))
}
