//! Unlink confirmation page and submission handler.

use askama::Template;
use axum::Form;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, Redirect};
use axum_extra::TypedHeader;
use axum_extra::headers;
use serde::Deserialize;
use subtle::ConstantTimeEq;

use super::error::IntoResponseError;
use super::router::SsoState;
use super::session::require_user;

#[derive(Template)]
#[template(path = "deauth.j2")]
struct DeauthTemplate {
    service: String,
    csrf_token: String,
}

/// `GET /deauth/{provider}` - confirmation page. Requires an authenticated
/// session; the CSRF token embedded in the form is the session's.
pub(super) async fn deauth_confirm(
    State(app): State<SsoState>,
    Path(provider): Path<String>,
    cookies: Option<TypedHeader<headers::Cookie>>,
) -> Result<Html<String>, (StatusCode, String)> {
    let record = require_user(&app, cookies.as_ref().map(|c| &c.0)).await?;

    // Reject unknown providers before rendering anything.
    app.coordinator
        .association_state(&provider, record.uid)
        .await
        .into_response_error()?;

    let template = DeauthTemplate {
        service: provider,
        csrf_token: record.csrf_token,
    };
    let html = template
        .render()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Html(html))
}

#[derive(Debug, Deserialize)]
pub(super) struct DeauthForm {
    csrf: String,
}

/// `POST /deauth/{provider}` - requires an authenticated session plus the
/// matching CSRF token, then removes the link.
pub(super) async fn deauth_submit(
    State(app): State<SsoState>,
    Path(provider): Path<String>,
    cookies: Option<TypedHeader<headers::Cookie>>,
    Form(form): Form<DeauthForm>,
) -> Result<Redirect, (StatusCode, String)> {
    let record = require_user(&app, cookies.as_ref().map(|c| &c.0)).await?;

    let csrf_matches: bool = form
        .csrf
        .as_bytes()
        .ct_eq(record.csrf_token.as_bytes())
        .into();
    if !csrf_matches {
        return Err((StatusCode::FORBIDDEN, "Csrf token mismatch".to_string()));
    }

    app.coordinator
        .unlink(&provider, record.uid)
        .await
        .into_response_error()?;

    Ok(Redirect::to("/me/edit"))
}
