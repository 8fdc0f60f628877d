use serde::{Deserialize, Serialize};

/// Local user identifier assigned by the host forum.
pub type Uid = i64;

/// Fields the host user factory needs to mint an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

/// An "on"/"off" switch as the host admin panel persists it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    On,
    #[default]
    Off,
}

impl Toggle {
    pub fn is_on(self) -> bool {
        matches!(self, Toggle::On)
    }
}

/// Admin-configured settings for one SSO provider.
///
/// Owned by the host configuration store and loaded anew for every
/// authentication attempt; the core never caches or mutates these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsoSettings {
    #[serde(rename = "id", default)]
    pub client_id: String,
    #[serde(rename = "secret", default)]
    pub client_secret: String,
    #[serde(rename = "ssoLogo", default)]
    pub sso_logo: Option<String>,
    #[serde(rename = "disableRegistration", default)]
    pub disable_registration: Toggle,
    #[serde(rename = "needToVerifyEmail", default)]
    pub need_to_verify_email: Toggle,
}

impl SsoSettings {
    /// A provider is usable only once the admin has supplied both client
    /// credentials.
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

/// Authenticated-session record exposed by the host session layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub uid: Uid,
    pub csrf_token: String,
}
