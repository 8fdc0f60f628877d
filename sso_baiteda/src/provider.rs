//! Provider descriptors and the registry the routing layer reads from.
//!
//! The registry is constructed once at process initialization and passed by
//! reference (or `Arc`) wherever provider lookups are needed. Nothing here
//! is mutated after startup.

use std::collections::HashMap;

use crate::config::{BAITEDA_AUTH_URL, BAITEDA_PROFILE_URL, BAITEDA_TOKEN_URL};

/// How a provider's token endpoint expects client credentials.
///
/// Modeled as data rather than behavior so a provider quirk is one enum
/// variant on its descriptor instead of an override of the exchange itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRequestStyle {
    /// RFC 6749 default: credentials in a basic Authorization header.
    BasicAuth,
    /// Credentials and the provider's fixed scope embedded in the form body.
    BodyCredentials,
}

/// Static description of one identity provider.
///
/// Per-deployment values (client id/secret, logo, policy toggles) are NOT
/// part of the descriptor; they are fetched from the host settings store on
/// every authentication attempt.
#[derive(Debug, Clone)]
pub struct ProviderDescriptor {
    pub name: String,
    /// Icon identifier surfaced in login and account menus.
    pub icon: String,
    pub auth_url: String,
    pub token_url: String,
    pub profile_url: String,
    pub scope: String,
    pub token_request_style: TokenRequestStyle,
}

impl ProviderDescriptor {
    /// The stock baiteda user-center descriptor.
    ///
    /// Baiteda wants `client_id`, `client_secret` and `scope=all` in the
    /// token POST body, not in a basic auth header.
    pub fn baiteda() -> Self {
        Self {
            name: "baiteda".to_string(),
            icon: "fa-telegram".to_string(),
            auth_url: BAITEDA_AUTH_URL.clone(),
            token_url: BAITEDA_TOKEN_URL.clone(),
            profile_url: BAITEDA_PROFILE_URL.clone(),
            scope: "all".to_string(),
            token_request_style: TokenRequestStyle::BodyCredentials,
        }
    }

    /// Settings-store key under which the host persists this provider's
    /// admin-configured settings payload.
    pub fn settings_key(&self) -> String {
        format!("sso-{}", self.name)
    }
}

/// Registry of identity providers keyed by name.
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, ProviderDescriptor>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registering a second descriptor under the same name replaces the
    /// first; registration happens once at startup so this only matters for
    /// tests overriding endpoint URLs.
    pub fn register(&mut self, descriptor: ProviderDescriptor) {
        self.providers.insert(descriptor.name.clone(), descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&ProviderDescriptor> {
        self.providers.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
