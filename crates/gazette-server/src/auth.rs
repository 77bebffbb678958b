//! Session shim for the external identity provider.
//!
//! Authentication itself is out of scope; this module only maps opaque
//! session tokens (issued at login, via bearer header or `session` cookie)
//! to user ids, and turns "no session" into the login redirect carrying
//! the original target in `next`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use gazette_store::{StoreError, User};
use uuid::Uuid;

use crate::api::AppState;
use crate::error::ServerError;

/// In-memory session registry: token -> user id.
#[derive(Clone, Default)]
pub struct Sessions {
    inner: Arc<RwLock<HashMap<String, Uuid>>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token for the user.
    pub fn issue(&self, user_id: Uuid) -> String {
        let token = Uuid::new_v4().to_string();
        self.inner
            .write()
            .expect("session lock poisoned")
            .insert(token.clone(), user_id);
        token
    }

    /// Resolve a token to a user id.
    pub fn resolve(&self, token: &str) -> Option<Uuid> {
        self.inner
            .read()
            .expect("session lock poisoned")
            .get(token)
            .copied()
    }

    /// Drop a token.  Returns the user it belonged to, if any.
    pub fn revoke(&self, token: &str) -> Option<Uuid> {
        self.inner
            .write()
            .expect("session lock poisoned")
            .remove(token)
    }
}

/// Pull the session token out of the request headers: `Authorization:
/// Bearer <token>` wins, then the `session` cookie.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        if let Some(token) = auth.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    let cookies = headers.get("cookie").and_then(|v| v.to_str().ok())?;
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|kv| kv.strip_prefix("session=").map(str::to_string))
}

fn lookup_user(parts: &Parts, state: &AppState) -> Result<Option<User>, ServerError> {
    let Some(token) = token_from_headers(&parts.headers) else {
        return Ok(None);
    };
    let Some(user_id) = state.sessions.resolve(&token) else {
        return Ok(None);
    };

    let db = state.db()?;
    match db.get_user(user_id) {
        Ok(user) => Ok(Some(user)),
        // Session for a user the store no longer knows; treat as anonymous.
        Err(StoreError::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn login_redirect(parts: &Parts) -> Response {
    let next = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    Redirect::to(&format!("/auth/login/?next={next}")).into_response()
}

/// The authenticated caller.  Rejects anonymous requests with a redirect
/// to the login page, preserving the original target.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match lookup_user(parts, state) {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => Err(login_redirect(parts)),
            Err(e) => Err(e.into_response()),
        }
    }
}

/// The caller, if authenticated.  Never rejects for anonymity.
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        lookup_user(parts, state)
            .map(MaybeUser)
            .map_err(IntoResponse::into_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer abc".parse().unwrap());
        headers.insert("cookie", "session=def".parse().unwrap());
        assert_eq!(token_from_headers(&headers), Some("abc".to_string()));
    }

    #[test]
    fn session_cookie_is_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", "theme=dark; session=xyz; lang=en".parse().unwrap());
        assert_eq!(token_from_headers(&headers), Some("xyz".to_string()));
    }

    #[test]
    fn issue_resolve_revoke_round_trip() {
        let sessions = Sessions::new();
        let user_id = Uuid::new_v4();

        let token = sessions.issue(user_id);
        assert_eq!(sessions.resolve(&token), Some(user_id));
        assert_eq!(sessions.revoke(&token), Some(user_id));
        assert_eq!(sessions.resolve(&token), None);
    }
}
