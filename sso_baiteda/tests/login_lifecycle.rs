//! End-to-end login and unlink flows against a mocked baiteda user-center.

use std::sync::Arc;

use httpmock::prelude::*;

use sso_baiteda::{
    CoordinationError, MemoryHost, OAuth2Error, ObjectStore, ProviderDescriptor, ProviderRegistry,
    Reconciled, SsoCoordinator, SsoSettings, Toggle, TokenGrant, TokenRequestStyle,
    UserRepository,
};

fn mock_descriptor(server: &MockServer) -> ProviderDescriptor {
    let mut descriptor = ProviderDescriptor::baiteda();
    descriptor.auth_url = server.url("/oauth/authorize");
    descriptor.token_url = server.url("/oauth/token");
    descriptor.profile_url = server.url("/user/detail");
    descriptor
}

fn configured_settings() -> SsoSettings {
    SsoSettings {
        client_id: "client-1".to_string(),
        client_secret: "secret-1".to_string(),
        ..SsoSettings::default()
    }
}

async fn build_coordinator(
    server: &MockServer,
    settings: SsoSettings,
) -> (Arc<MemoryHost>, SsoCoordinator) {
    let host = Arc::new(MemoryHost::new());
    host.put_settings("sso-baiteda", settings).await;

    let mut registry = ProviderRegistry::new();
    registry.register(mock_descriptor(server));

    let coordinator = SsoCoordinator::new(
        Arc::new(registry),
        host.clone(),
        host.clone(),
        host.clone(),
    );
    (host, coordinator)
}

const PROFILE_BODY: &str = r#"{
    "data": {
        "user_base_info": { "user_id": "ext-42" },
        "mobile": "+86-130-0000-0000",
        "tenant_list": [ { "tenant_name": "Acme" } ]
    }
}"#;

#[tokio::test]
async fn login_creates_linked_account_and_unlink_reverses_it() {
    let server = MockServer::start_async().await;
    let (host, coordinator) = build_coordinator(&server, configured_settings()).await;

    let token_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/oauth/token")
                .header("content-type", "application/x-www-form-urlencoded")
                .body_includes("grant_type=authorization_code")
                .body_includes("code=valid-code")
                .body_includes("client_id=client-1")
                .body_includes("client_secret=secret-1")
                .body_includes("scope=all");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"access_token":"at-1","refresh_token":"rt-1","token_type":"Bearer"}"#);
        })
        .await;
    let profile_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/user/detail")
                .header("authorization", "Bearer at-1");
            then.status(200)
                .header("content-type", "application/json")
                .body(PROFILE_BODY);
        })
        .await;

    let outcome = coordinator
        .login("baiteda", "valid-code")
        .await
        .expect("login should succeed");

    token_mock.assert_async().await;
    profile_mock.assert_async().await;

    let uid = match outcome {
        Reconciled::Created { uid } => uid,
        other => panic!("expected Created, got {other:?}"),
    };

    assert_eq!(
        host.get_object_field("baitedaid:uid", "ext-42")
            .await
            .unwrap(),
        Some(uid.to_string())
    );
    assert_eq!(
        host.get_user_field(uid, "baitedaid").await.unwrap(),
        Some("ext-42".to_string())
    );
    assert_eq!(
        host.get_user_field(uid, "email").await.unwrap(),
        Some("@Acme".to_string())
    );
    assert_eq!(
        host.get_user_field(uid, "email:confirmed").await.unwrap(),
        Some("1".to_string())
    );

    let reported = coordinator.unlink("baiteda", uid).await.unwrap();
    assert_eq!(reported, uid);
    assert_eq!(
        host.get_object_field("baitedaid:uid", "ext-42")
            .await
            .unwrap(),
        None
    );
    assert_eq!(host.get_user_field(uid, "baitedaid").await.unwrap(), None);
}

#[tokio::test]
async fn query_string_token_body_still_logs_in() {
    let server = MockServer::start_async().await;
    let (host, coordinator) = build_coordinator(&server, configured_settings()).await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/oauth/token");
            // No JSON content type and a query-string body, as some
            // providers in this ecosystem still answer.
            then.status(200)
                .header("content-type", "text/html")
                .body("access_token=at-qs&refresh_token=rt-qs&token_type=bearer");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/user/detail")
                .header("authorization", "Bearer at-qs");
            then.status(200)
                .header("content-type", "application/json")
                .body(PROFILE_BODY);
        })
        .await;

    let outcome = coordinator
        .login("baiteda", "valid-code")
        .await
        .expect("login should tolerate a query-string token body");

    assert_eq!(host.user_count().await, 1);
    assert!(matches!(outcome, Reconciled::Created { .. }));
}

#[tokio::test]
async fn relogin_reuses_the_associated_account() {
    let server = MockServer::start_async().await;
    let (host, coordinator) = build_coordinator(&server, configured_settings()).await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"access_token":"at-1","token_type":"Bearer"}"#);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/user/detail");
            then.status(200)
                .header("content-type", "application/json")
                .body(PROFILE_BODY);
        })
        .await;

    let first = coordinator.login("baiteda", "code-1").await.unwrap();
    let second = coordinator.login("baiteda", "code-2").await.unwrap();

    assert!(matches!(first, Reconciled::Created { .. }));
    assert!(matches!(second, Reconciled::Associated { uid } if uid == first.uid()));
    assert_eq!(host.user_count().await, 1);
}

#[tokio::test]
async fn registration_disabled_aborts_before_any_creation() {
    let server = MockServer::start_async().await;
    let settings = SsoSettings {
        disable_registration: Toggle::On,
        ..configured_settings()
    };
    let (host, coordinator) = build_coordinator(&server, settings).await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"access_token":"at-1","token_type":"Bearer"}"#);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/user/detail");
            then.status(200)
                .header("content-type", "application/json")
                .body(PROFILE_BODY);
        })
        .await;

    let result = coordinator.login("baiteda", "valid-code").await;

    match result {
        Err(CoordinationError::RegistrationDisabled { provider }) => {
            assert_eq!(provider, "baiteda");
        }
        other => panic!("expected RegistrationDisabled, got {other:?}"),
    }
    assert_eq!(host.user_count().await, 0);
    assert_eq!(
        host.get_object_field("baitedaid:uid", "ext-42")
            .await
            .unwrap(),
        None
    );
}

#[tokio::test]
async fn token_endpoint_failure_surfaces_as_exchange_error() {
    let server = MockServer::start_async().await;
    let (host, coordinator) = build_coordinator(&server, configured_settings()).await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(400)
                .header("content-type", "application/json")
                .body(r#"{"error":"invalid_grant"}"#);
        })
        .await;

    let result = coordinator.login("baiteda", "expired-code").await;

    assert!(matches!(
        result,
        Err(CoordinationError::OAuth2(OAuth2Error::TokenExchange(_)))
    ));
    assert_eq!(host.user_count().await, 0);
}

#[tokio::test]
async fn profile_without_user_id_is_malformed() {
    let server = MockServer::start_async().await;
    let (host, coordinator) = build_coordinator(&server, configured_settings()).await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"access_token":"at-1","token_type":"Bearer"}"#);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/user/detail");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"data":{"tenant_list":[]}}"#);
        })
        .await;

    let result = coordinator.login("baiteda", "valid-code").await;

    assert!(matches!(
        result,
        Err(CoordinationError::OAuth2(OAuth2Error::MalformedProfile(_)))
    ));
    assert_eq!(host.user_count().await, 0);
}

#[tokio::test]
async fn basic_auth_style_uses_the_authorization_header() {
    let server = MockServer::start_async().await;

    let host = Arc::new(MemoryHost::new());
    host.put_settings("sso-baiteda", configured_settings()).await;

    let mut descriptor = mock_descriptor(&server);
    descriptor.token_request_style = TokenRequestStyle::BasicAuth;
    let mut registry = ProviderRegistry::new();
    registry.register(descriptor);

    let coordinator = SsoCoordinator::new(
        Arc::new(registry),
        host.clone(),
        host.clone(),
        host.clone(),
    );

    let token_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/oauth/token")
                .header_exists("authorization")
                .body_includes("grant_type=authorization_code");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"access_token":"at-basic","token_type":"Bearer"}"#);
        })
        .await;

    let token_set = coordinator
        .exchange(
            "baiteda",
            TokenGrant::AuthorizationCode("valid-code".to_string()),
        )
        .await
        .expect("basic-auth exchange should succeed");

    token_mock.assert_async().await;
    assert_eq!(token_set.access_token, "at-basic");
}

#[tokio::test]
async fn refresh_grant_posts_refresh_token_parameter() {
    let server = MockServer::start_async().await;
    let (_host, coordinator) = build_coordinator(&server, configured_settings()).await;

    let token_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/oauth/token")
                .body_includes("grant_type=refresh_token")
                .body_includes("refresh_token=rt-old")
                .body_includes("scope=all");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"access_token":"at-new","refresh_token":"rt-new","token_type":"Bearer"}"#);
        })
        .await;

    let token_set = coordinator
        .exchange("baiteda", TokenGrant::RefreshToken("rt-old".to_string()))
        .await
        .expect("refresh exchange should succeed");

    token_mock.assert_async().await;
    assert_eq!(token_set.access_token, "at-new");
    assert_eq!(token_set.refresh_token.as_deref(), Some("rt-new"));
    assert!(!token_set.claims.contains_key("refresh_token"));
}
