use serde_json::{Map, Value};

/// Grant presented to the provider's token endpoint.
#[derive(Debug, Clone)]
pub enum TokenGrant {
    AuthorizationCode(String),
    RefreshToken(String),
}

impl TokenGrant {
    pub(crate) fn grant_type(&self) -> &'static str {
        match self {
            Self::AuthorizationCode(_) => "authorization_code",
            Self::RefreshToken(_) => "refresh_token",
        }
    }

    /// Form parameter carrying the grant value. The refresh grant posts the
    /// token under `refresh_token` instead of `code`.
    pub(crate) fn code_param(&self) -> (&'static str, &str) {
        match self {
            Self::AuthorizationCode(code) => ("code", code),
            Self::RefreshToken(token) => ("refresh_token", token),
        }
    }
}

/// Result of a token exchange.
///
/// The refresh token is pulled out of the raw result before the remaining
/// fields are forwarded as `claims`, so downstream code never sees it mixed
/// in with provider metadata.
#[derive(Debug, Clone)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub claims: Map<String, Value>,
}

/// Canonical profile produced from the provider's user-detail payload.
///
/// Constructed once per login attempt and discarded after reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedProfile {
    /// Opaque provider-assigned identifier, unique per provider.
    pub external_id: String,
    /// Always non-empty. The provider does not reliably supply a display
    /// name, so a randomized placeholder nickname is generated instead.
    pub display_name: String,
    pub mobile: Option<String>,
    /// Tenant memberships flattened into one human-readable label.
    pub tenant_label: Option<String>,
    /// `"@" + tenant_label` when the label is non-empty. A placeholder
    /// identity key, not a deliverable address.
    pub derived_email: Option<String>,
}
