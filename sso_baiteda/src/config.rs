//! Central configuration for the sso-baiteda crate

use std::sync::LazyLock;

/// Public base URL of the forum that hosts this integration
///
/// Used when building absolute callback and deauthorization URLs handed to
/// the identity provider and to the account menu.
/// Default: "http://localhost:3001"
pub static FORUM_BASE_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("FORUM_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
});

/// Route prefix under which the SSO endpoints are mounted
///
/// Empty by default, which places the endpoints at `/auth/{provider}` and
/// `/deauth/{provider}` like the rest of the forum's authentication routes.
pub static SSO_ROUTE_PREFIX: LazyLock<String> =
    LazyLock::new(|| std::env::var("SSO_ROUTE_PREFIX").unwrap_or_default());

/// Baiteda user-center authorization endpoint
pub(crate) static BAITEDA_AUTH_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("SSO_BAITEDA_AUTH_URL").unwrap_or_else(|_| {
        "https://user-center-test.baiteda.com:8443/user_center/api/public/sso/oauth/authorize"
            .to_string()
    })
});

/// Baiteda user-center token endpoint
pub(crate) static BAITEDA_TOKEN_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("SSO_BAITEDA_TOKEN_URL").unwrap_or_else(|_| {
        "https://user-center-test.baiteda.com:8443/user_center/api/public/sso/oauth/token"
            .to_string()
    })
});

/// Baiteda user-center profile endpoint
pub(crate) static BAITEDA_PROFILE_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("SSO_BAITEDA_PROFILE_URL").unwrap_or_else(|_| {
        "https://user-center-test.baiteda.com:8443/user_center/api/private/user/detail".to_string()
    })
});
