//! Router-level tests for the session, CSRF, and unlink plumbing.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use sso_baiteda::{
    MemoryHost, NewUser, ObjectStore, ProviderDescriptor, ProviderRegistry, SessionStore,
    SsoCoordinator, SsoSettings, Uid, UserRepository,
};
use sso_baiteda_axum::{SESSION_COOKIE_NAME, SsoState, sso_router};

async fn fixture() -> (Arc<MemoryHost>, Router) {
    let host = Arc::new(MemoryHost::new());
    host.put_settings(
        "sso-baiteda",
        SsoSettings {
            client_id: "client-1".to_string(),
            client_secret: "secret-1".to_string(),
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

    let router = sso_router(SsoState {
        coordinator,
        sessions: host.clone(),
    });
    (host, router)
}

async fn linked_user(host: &MemoryHost) -> Uid {
    let uid = host
        .create(NewUser {
            username: "linked".to_string(),
            email: "linked@example.com".to_string(),
        })
        .await
        .unwrap();
    host.set_user_field(uid, "baitedaid", "ext-1").await.unwrap();
    host.set_object_field("baitedaid:uid", "ext-1", &uid.to_string())
        .await
        .unwrap();
    uid
}

fn deauth_post(cookie: Option<&str>, csrf: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/deauth/baiteda")
        .header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, format!("{SESSION_COOKIE_NAME}={cookie}"));
    }
    builder
        .body(Body::from(format!("csrf={csrf}")))
        .expect("request should build")
}

#[tokio::test]
async fn deauth_post_without_session_is_unauthorized() {
    let (_host, router) = fixture().await;

    let response = router
        .oneshot(deauth_post(None, "whatever"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deauth_post_with_wrong_csrf_is_forbidden() {
    let (host, router) = fixture().await;
    let uid = linked_user(&host).await;
    let cookie = host.create_session(uid).await.unwrap();

    let response = router
        .oneshot(deauth_post(Some(&cookie), "not-the-token"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    // The link must survive the rejected attempt.
    assert_eq!(
        host.get_user_field(uid, "baitedaid").await.unwrap(),
        Some("ext-1".to_string())
    );
}

#[tokio::test]
async fn deauth_post_with_valid_csrf_unlinks_and_redirects() {
    let (host, router) = fixture().await;
    let uid = linked_user(&host).await;
    let cookie = host.create_session(uid).await.unwrap();
    let csrf = host
        .session(&cookie)
        .await
        .unwrap()
        .expect("session exists")
        .csrf_token;

    let response = router
        .oneshot(deauth_post(Some(&cookie), &csrf))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/me/edit")
    );
    assert_eq!(host.get_user_field(uid, "baitedaid").await.unwrap(), None);
    assert_eq!(
        host.get_object_field("baitedaid:uid", "ext-1").await.unwrap(),
        None
    );
}

#[tokio::test]
async fn deauth_page_embeds_session_csrf_token() {
    let (host, router) = fixture().await;
    let uid = linked_user(&host).await;
    let cookie = host.create_session(uid).await.unwrap();
    let csrf = host
        .session(&cookie)
        .await
        .unwrap()
        .expect("session exists")
        .csrf_token;

    let request = Request::builder()
        .method("GET")
        .uri("/deauth/baiteda")
        .header(header::COOKIE, format!("{SESSION_COOKIE_NAME}={cookie}"))
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains(&csrf));
    assert!(body.contains("baiteda"));
}

#[tokio::test]
async fn auth_redirect_for_unknown_provider_is_not_found() {
    let (_host, router) = fixture().await;

    let request = Request::builder()
        .method("GET")
        .uri("/auth/ghost")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn auth_redirect_points_at_the_provider() {
    let (_host, router) = fixture().await;

    let request = Request::builder()
        .method("GET")
        .uri("/auth/baiteda")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("redirect has a location");
    assert!(location.contains("client_id=client-1"));
    assert!(location.contains("response_type=code"));
}

#[tokio::test]
async fn admin_page_shows_the_callback_url() {
    let (_host, router) = fixture().await;

    let request = Request::builder()
        .method("GET")
        .uri("/admin/plugins/sso/baiteda")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains("/auth/baiteda/callback"));
}
