//! Admin settings page for one provider.
//!
//! Mount the router behind the host's admin middleware; this handler does
//! not gate on its own.

use askama::Template;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Html;

use super::error::IntoResponseError;
use super::router::SsoState;

#[derive(Template)]
#[template(path = "admin.j2")]
struct AdminTemplate {
    provider: String,
    callback_url: String,
}

/// `GET /admin/plugins/sso/{provider}` - shows the callback URL the admin
/// must register with the provider, alongside the settings form fields.
pub(super) async fn admin_page(
    State(app): State<SsoState>,
    Path(provider): Path<String>,
) -> Result<Html<String>, (StatusCode, String)> {
    let callback_url = app
        .coordinator
        .callback_url(&provider)
        .into_response_error()?;

    let template = AdminTemplate {
        provider,
        callback_url,
    };
    let html = template
        .render()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Html(html))
}
