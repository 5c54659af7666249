//! Per-request session and flash state.
//!
//! The whole session lives in one signed cookie: a base64url-encoded JSON
//! object with an optional signed-in username and an optional flash
//! message. Handlers receive it as a [`Session`] extractor, mutate it, and
//! hand it back as part of the response, which re-signs and re-emits the
//! cookie. A tampered or undecodable cookie reads as an empty session.
//!
//! Protected handlers take [`SignedIn`] instead. When nobody is signed in
//! the extractor rejects with a redirect to `/` carrying the
//! [`SIGN_IN_REQUIRED`] flash, and the handler body never runs.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, IntoResponseParts, Response, ResponseParts};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::reply::Reply;
use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "inkwell_session";

/// Flash shown when a protected action is attempted while signed out.
pub const SIGN_IN_REQUIRED: &str = "You must be signed in to do that.";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    flash: Option<String>,
}

/// Session state for one request/response cycle.
pub struct Session {
    jar: SignedCookieJar,
    data: SessionData,
    had_cookie: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.data.user)
            .field("flash", &self.data.flash)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Read the session out of a signed cookie jar.
    #[must_use]
    pub fn from_jar(jar: SignedCookieJar) -> Self {
        let cookie = jar.get(SESSION_COOKIE);
        let had_cookie = cookie.is_some();
        let data = cookie
            .and_then(|c| decode(c.value()))
            .unwrap_or_default();
        Self {
            jar,
            data,
            had_cookie,
        }
    }

    /// Username of the signed-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.data.user.as_deref()
    }

    pub fn sign_in(&mut self, username: impl Into<String>) {
        self.data.user = Some(username.into());
    }

    pub fn sign_out(&mut self) {
        self.data.user = None;
    }

    /// Set the flash message, replacing any pending one.
    pub fn flash(&mut self, message: impl Into<String>) {
        self.data.flash = Some(message.into());
    }

    /// Remove and return the pending flash message.
    pub fn take_flash(&mut self) -> Option<String> {
        self.data.flash.take()
    }
}

impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::from_headers(&parts.headers, state.cookie_key.clone());
        Ok(Self::from_jar(jar))
    }
}

impl IntoResponseParts for Session {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        let jar = if self.data != SessionData::default() {
            let cookie = Cookie::build((SESSION_COOKIE, encode(&self.data)))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .build();
            self.jar.add(cookie)
        } else if self.had_cookie {
            self.jar.remove(Cookie::build(SESSION_COOKIE).path("/").build())
        } else {
            self.jar
        };
        jar.into_response_parts(res)
    }
}

/// Extractor for handlers that require a signed-in user.
#[derive(Debug)]
pub struct SignedIn {
    /// The signed-in username.
    pub username: String,
    /// The request's session, for setting flash messages.
    pub session: Session,
}

impl FromRequestParts<Arc<AppState>> for SignedIn {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::from_headers(&parts.headers, state.cookie_key.clone());
        let mut session = Session::from_jar(jar);

        if let Some(username) = session.user().map(str::to_owned) {
            return Ok(Self { username, session });
        }

        info!(
            method = %parts.method,
            path = %parts.uri.path(),
            "rejected signed-out request to protected route"
        );
        session.flash(SIGN_IN_REQUIRED);
        Err((session, Reply::redirect("/")).into_response())
    }
}

fn encode(data: &SessionData) -> String {
    let json = serde_json::to_vec(data).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

fn decode(value: &str) -> Option<SessionData> {
    let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
    match serde_json::from_slice(&bytes) {
        Ok(data) => Some(data),
        Err(e) => {
            debug!(error = %e, "discarding undecodable session cookie");
            None
        }
    }
}
