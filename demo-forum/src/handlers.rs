use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum_extra::{TypedHeader, headers};

use sso_baiteda::SessionStore;
use sso_baiteda_axum::{SESSION_COOKIE_NAME, SsoState};

pub(crate) async fn index(
    State(app): State<SsoState>,
) -> Result<Html<String>, (StatusCode, String)> {
    let entries = app
        .coordinator
        .strategy_entries()
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let mut links = String::new();
    for entry in entries {
        links.push_str(&format!(
            r#"<li><a href="{}">Sign in with {}</a></li>"#,
            entry.url, entry.name
        ));
    }

    Ok(Html(format!(
        r#"<h1>Demo forum</h1>
<ul>{links}</ul>
<p><a href="/me/edit">My profile</a></p>"#
    )))
}

pub(crate) async fn me_edit(
    State(app): State<SsoState>,
    cookies: Option<TypedHeader<headers::Cookie>>,
) -> Result<Html<String>, (StatusCode, String)> {
    let record = match cookies.as_ref().and_then(|c| c.0.get(SESSION_COOKIE_NAME)) {
        Some(cookie) => app
            .sessions
            .session(cookie)
            .await
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?,
        None => None,
    };

    let Some(record) = record else {
        return Ok(Html(
            r#"<p>Not signed in.</p><p><a href="/">Home</a></p>"#.to_string(),
        ));
    };

    let states = app
        .coordinator
        .association_states(record.uid)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let mut items = String::new();
    for state in states {
        let action = if state.associated {
            format!(r#"linked - <a href="{}">disconnect</a>"#, state.url)
        } else {
            format!(r#"not linked - <a href="{}">connect</a>"#, state.url)
        };
        items.push_str(&format!("<li>{}: {action}</li>", state.name));
    }

    Ok(Html(format!(
        r#"<h1>Profile of uid {}</h1>
<ul>{items}</ul>
<p><a href="/">Home</a></p>"#,
        record.uid
    )))
}
