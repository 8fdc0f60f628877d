//! Session lookup against the host session layer.

use axum_extra::headers;
use http::StatusCode;
use sso_baiteda::{SessionRecord, SessionStore};

use super::router::SsoState;

/// Cookie under which the host forum stores its session id.
pub const SESSION_COOKIE_NAME: &str = "forum.sid";

/// Resolve the authenticated session for a request, or reject it.
pub(super) async fn require_user(
    state: &SsoState,
    cookies: Option<&headers::Cookie>,
) -> Result<SessionRecord, (StatusCode, String)> {
    let cookie = cookies
        .and_then(|cookies| cookies.get(SESSION_COOKIE_NAME))
        .ok_or((StatusCode::UNAUTHORIZED, "Not authenticated".to_string()))?;

    match state.sessions.session(cookie).await {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err((StatusCode::UNAUTHORIZED, "Not authenticated".to_string())),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}
