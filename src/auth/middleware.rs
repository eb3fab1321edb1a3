//! Request identity extraction and session cookies

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::api::server::SharedState;
use crate::auth::models::Identity;
use crate::error::Error;

/// Read a session id from the `Cookie` header
pub fn session_id_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let prefix = format!("{}=", cookie_name);
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| cookie.trim().strip_prefix(prefix.as_str()).map(str::to_string))
        .filter(|id| !id.is_empty())
}

/// `Set-Cookie` value binding the browser to a session
pub fn session_cookie(cookie_name: &str, session_id: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", cookie_name, session_id)
}

/// `Set-Cookie` value that removes the session cookie
pub fn expired_session_cookie(cookie_name: &str) -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
        cookie_name
    )
}

/// Identity of the requester, resolved from the session cookie
#[derive(Debug, Clone, Default)]
pub struct CurrentIdentity {
    pub identity: Identity,
    /// Session id presented by the client, live or not
    pub session_id: Option<String>,
}

impl FromRequestParts<SharedState> for CurrentIdentity {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let Some(session_id) =
            session_id_from_headers(&parts.headers, &state.config.auth.session_cookie)
        else {
            return Ok(Self::default());
        };

        let Some(session) = state.sessions.get_session(&session_id).await else {
            return Ok(Self {
                identity: Identity::Anonymous,
                session_id: Some(session_id),
            });
        };

        let identity = match state.db.find_user(session.user_id).await? {
            Some(user) => Identity::Authenticated(user),
            None => {
                tracing::warn!(user_id = session.user_id, "Session references a missing account");
                state.sessions.delete_session(&session_id).await;
                Identity::Anonymous
            }
        };

        Ok(Self {
            identity,
            session_id: Some(session_id),
        })
    }
}
