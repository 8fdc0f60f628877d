//! Router wiring for the SSO endpoints.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use sso_baiteda::{SessionStore, SsoCoordinator};

/// Shared state handed to every handler: the coordinator plus the host
/// session layer.
#[derive(Clone)]
pub struct SsoState {
    pub coordinator: Arc<SsoCoordinator>,
    pub sessions: Arc<dyn SessionStore>,
}

/// Build the SSO router.
///
/// Endpoints, relative to the mount point:
/// - `GET  /auth/{provider}` - start the authorization redirect
/// - `GET  /auth/{provider}/callback` - complete the login
/// - `GET  /deauth/{provider}` - unlink confirmation page
/// - `POST /deauth/{provider}` - unlink (session + CSRF required)
/// - `GET  /admin/plugins/sso/{provider}` - admin settings page
pub fn sso_router(state: SsoState) -> Router {
    Router::new()
        .route("/auth/{provider}", get(super::auth::auth_redirect))
        .route("/auth/{provider}/callback", get(super::auth::auth_callback))
        .route(
            "/deauth/{provider}",
            get(super::deauth::deauth_confirm).post(super::deauth::deauth_submit),
        )
        .route(
            "/admin/plugins/sso/{provider}",
            get(super::admin::admin_page),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sso_baiteda::{MemoryHost, ProviderDescriptor, ProviderRegistry};

    #[tokio::test]
    async fn test_router_builds_with_state() {
        let host = Arc::new(MemoryHost::new());
        let mut registry = ProviderRegistry::new();
        registry.register(ProviderDescriptor::baiteda());

        let coordinator = Arc::new(SsoCoordinator::new(
            Arc::new(registry),
            host.clone(),
            host.clone(),
            host.clone(),
        ));

        let _router = sso_router(SsoState {
            coordinator,
            sessions: host,
        });
    }
}
