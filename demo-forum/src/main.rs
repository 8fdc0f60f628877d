use std::sync::Arc;

use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sso_baiteda::{
    MemoryHost, ProviderDescriptor, ProviderRegistry, SsoCoordinator, SsoSettings,
};
use sso_baiteda_axum::{SsoState, sso_router};

mod handlers;

use crate::handlers::{index, me_edit};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,sso_baiteda=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let host = Arc::new(MemoryHost::new());
    host.put_settings(
        "sso-baiteda",
        SsoSettings {
            client_id: std::env::var("SSO_BAITEDA_CLIENT_ID")
                .unwrap_or_else(|_| "demo-client".to_string()),
            client_secret: std::env::var("SSO_BAITEDA_CLIENT_SECRET")
                .unwrap_or_else(|_| "demo-secret".to_string()),
            ..SsoSettings::default()
        },
    )
    .await;

    let mut registry = ProviderRegistry::new();
    registry.register(ProviderDescriptor::baiteda());

    let coordinator = Arc::new(SsoCoordinator::new(
        Arc::new(registry),
        host.clone(),
        host.clone(),
        host.clone(),
    ));

    let state = SsoState {
        coordinator,
        sessions: host,
    };

    let app = Router::new()
        .route("/", get(index))
        .route("/me/edit", get(me_edit))
        .with_state(state.clone())
        .merge(sso_router(state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3001").await?;
    tracing::info!("Demo forum listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
