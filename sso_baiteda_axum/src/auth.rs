//! Authorization redirect and callback handlers.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header::SET_COOKIE};
use axum::response::Redirect;
use serde::Deserialize;

use sso_baiteda::{CoordinationError, SessionStore};

use super::error::IntoResponseError;
use super::router::SsoState;
use super::session::SESSION_COOKIE_NAME;

/// `GET /auth/{provider}` - hand the browser to the identity provider.
pub(super) async fn auth_redirect(
    State(app): State<SsoState>,
    Path(provider): Path<String>,
) -> Result<Redirect, (StatusCode, String)> {
    let url = app
        .coordinator
        .auth_request_url(&provider)
        .await
        .into_response_error()?;
    Ok(Redirect::to(&url))
}

#[derive(Debug, Deserialize)]
pub(super) struct CallbackQuery {
    code: String,
    // The provider echoes a state parameter; state checking is disabled for
    // this provider, so it is accepted and ignored.
    #[serde(rename = "state", default)]
    _state: Option<String>,
}

/// `GET /auth/{provider}/callback` - complete the login and establish a
/// host session for the reconciled account.
pub(super) async fn auth_callback(
    State(app): State<SsoState>,
    Path(provider): Path<String>,
    Query(query): Query<CallbackQuery>,
) -> Result<(HeaderMap, Redirect), (StatusCode, String)> {
    let outcome = match app.coordinator.login(&provider, &query.code).await {
        Ok(outcome) => outcome,
        Err(CoordinationError::RegistrationDisabled { .. }) => {
            // Policy block, not a server fault: send the user back to the
            // login page with the translatable error tag.
            let target = format!(
                "/login?error={}",
                urlencoding::encode("sso-registration-disabled")
            );
            return Ok((HeaderMap::new(), Redirect::to(&target)));
        }
        Err(e) => return Err(e).into_response_error(),
    };

    let cookie_value = app
        .sessions
        .create_session(outcome.uid())
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let mut headers = HeaderMap::new();
    let cookie = format!("{SESSION_COOKIE_NAME}={cookie_value}; SameSite=Lax; HttpOnly; Path=/");
    headers.append(
        SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build session cookie".to_string()))?,
    );

    tracing::debug!("Login completed for provider {provider}: uid {}", outcome.uid());
    Ok((headers, Redirect::to("/me/edit")))
}
