//! Login, unlink, and menu-state coordination.
//!
//! `SsoCoordinator` owns the provider registry, the host collaborator
//! handles, and the outbound HTTP client. All per-attempt state (settings,
//! tokens, profiles) is loaded fresh inside each call and passed down as
//! plain parameters.

use std::sync::Arc;

use serde::Serialize;
use url::Url;

use crate::association::{AssociationStore, external_id_field};
use crate::config::{FORUM_BASE_URL, SSO_ROUTE_PREFIX};
use crate::host::{ObjectStore, SettingsProvider, SsoSettings, Uid, UserRepository};
use crate::oauth2::{
    NormalizedProfile, OAuth2Error, TokenGrant, TokenSet, build_client, exchange_token,
    fetch_profile, normalize_profile,
};
use crate::provider::{ProviderDescriptor, ProviderRegistry};

use super::errors::CoordinationError;
use super::locks::KeyedLocks;
use super::reconcile::{Reconciled, reconcile_login};

/// Link state of one provider for one local account, as surfaced in the
/// account settings menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssociationState {
    pub name: String,
    pub icon: String,
    pub associated: bool,
    /// Deauthorization URL when linked, authorization entry point otherwise.
    pub url: String,
}

/// Login-page entry for one configured provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyEntry {
    pub name: String,
    pub url: String,
    pub callback_url: String,
    pub icon: String,
    pub logo: Option<String>,
    pub scope: String,
}

pub struct SsoCoordinator {
    registry: Arc<ProviderRegistry>,
    users: Arc<dyn UserRepository>,
    store: Arc<dyn ObjectStore>,
    settings: Arc<dyn SettingsProvider>,
    client: reqwest::Client,
    locks: KeyedLocks,
}

impl SsoCoordinator {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        users: Arc<dyn UserRepository>,
        store: Arc<dyn ObjectStore>,
        settings: Arc<dyn SettingsProvider>,
    ) -> Self {
        Self {
            registry,
            users,
            store,
            settings,
            client: build_client(),
            locks: KeyedLocks::new(),
        }
    }

    fn descriptor(&self, provider: &str) -> Result<&ProviderDescriptor, CoordinationError> {
        self.registry
            .get(provider)
            .ok_or_else(|| CoordinationError::UnknownProvider(provider.to_string()).log())
    }

    /// Settings are owned by the host store and re-read on every attempt.
    async fn settings_for(
        &self,
        descriptor: &ProviderDescriptor,
    ) -> Result<SsoSettings, CoordinationError> {
        let settings = self.settings.settings(&descriptor.settings_key()).await?;
        if !settings.is_configured() {
            return Err(
                CoordinationError::ProviderNotConfigured(descriptor.name.clone()).log(),
            );
        }
        Ok(settings)
    }

    fn association_store(&self, provider_name: &str) -> AssociationStore {
        AssociationStore::new(self.store.clone(), provider_name)
    }

    fn route_base() -> String {
        format!("{}{}", FORUM_BASE_URL.as_str(), SSO_ROUTE_PREFIX.as_str())
    }

    /// Absolute callback URL registered with the provider.
    pub fn callback_url(&self, provider: &str) -> Result<String, CoordinationError> {
        let descriptor = self.descriptor(provider)?;
        Ok(format!(
            "{}/auth/{}/callback",
            Self::route_base(),
            descriptor.name
        ))
    }

    /// Build the provider authorization redirect URL for one login attempt.
    pub async fn auth_request_url(&self, provider: &str) -> Result<String, CoordinationError> {
        let descriptor = self.descriptor(provider)?;
        let settings = self.settings_for(descriptor).await?;

        let mut url = Url::parse(&descriptor.auth_url)
            .map_err(|e| CoordinationError::OAuth2(OAuth2Error::InvalidEndpoint(e.to_string())))?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &settings.client_id)
            .append_pair("redirect_uri", &self.callback_url(provider)?)
            .append_pair("scope", &descriptor.scope);

        Ok(url.into())
    }

    /// Exchange a grant at the provider's token endpoint.
    pub async fn exchange(
        &self,
        provider: &str,
        grant: TokenGrant,
    ) -> Result<TokenSet, CoordinationError> {
        let descriptor = self.descriptor(provider)?;
        let settings = self.settings_for(descriptor).await?;
        Ok(exchange_token(&self.client, descriptor, &settings, grant).await?)
    }

    /// Complete a callback: exchange the code, fetch and normalize the
    /// profile, and reconcile it to exactly one local account.
    pub async fn login(&self, provider: &str, code: &str) -> Result<Reconciled, CoordinationError> {
        let descriptor = self.descriptor(provider)?;
        let settings = self.settings_for(descriptor).await?;

        let token_set = exchange_token(
            &self.client,
            descriptor,
            &settings,
            TokenGrant::AuthorizationCode(code.to_string()),
        )
        .await?;
        let raw = fetch_profile(&self.client, descriptor, &token_set.access_token).await?;
        let profile = normalize_profile(&raw)?;

        self.reconcile_profile(descriptor, &settings, &profile).await
    }

    pub(crate) async fn reconcile_profile(
        &self,
        descriptor: &ProviderDescriptor,
        settings: &SsoSettings,
        profile: &NormalizedProfile,
    ) -> Result<Reconciled, CoordinationError> {
        // Single-flight per external id within this process; see locks.rs.
        let _guard = self.locks.acquire(&profile.external_id).await;

        let associations = self.association_store(&descriptor.name);
        let outcome = reconcile_login(
            self.users.as_ref(),
            &associations,
            settings,
            &descriptor.name,
            profile,
        )
        .await?;

        tracing::info!(
            "Reconciled {} login for external id {}: uid {}",
            descriptor.name,
            profile.external_id,
            outcome.uid()
        );
        Ok(outcome)
    }

    /// Remove the link between `uid` and its external identity.
    ///
    /// Failures are logged with the affected uid and surfaced as
    /// `UnlinkFailed`; a forward entry that no longer points at `uid` is
    /// left untouched.
    pub async fn unlink(&self, provider: &str, uid: Uid) -> Result<Uid, CoordinationError> {
        let descriptor = self.descriptor(provider)?;
        match self.unlink_inner(descriptor, uid).await {
            Ok(uid) => Ok(uid),
            Err(err) => {
                tracing::error!(
                    "Could not remove external identity data for uid {uid}: {err}"
                );
                Err(err)
            }
        }
    }

    async fn unlink_inner(
        &self,
        descriptor: &ProviderDescriptor,
        uid: Uid,
    ) -> Result<Uid, CoordinationError> {
        let field = external_id_field(&descriptor.name);
        let external_id = self
            .users
            .get_user_field(uid, &field)
            .await
            .map_err(|e| CoordinationError::UnlinkFailed {
                uid,
                reason: e.to_string(),
            })?
            .ok_or(CoordinationError::NotLinked(uid))?;

        let _guard = self.locks.acquire(&external_id).await;

        let associations = self.association_store(&descriptor.name);
        match associations.get(&external_id).await {
            Ok(Some(stored)) if stored != uid => {
                tracing::warn!(
                    "Association for external id {external_id} points at uid {stored}, not {uid}; leaving the forward entry in place"
                );
            }
            Ok(_) => {
                associations
                    .remove(&external_id)
                    .await
                    .map_err(|e| CoordinationError::UnlinkFailed {
                        uid,
                        reason: e.to_string(),
                    })?;
            }
            Err(e) => {
                return Err(CoordinationError::UnlinkFailed {
                    uid,
                    reason: e.to_string(),
                });
            }
        }

        self.users
            .delete_user_field(uid, &field)
            .await
            .map_err(|e| CoordinationError::UnlinkFailed {
                uid,
                reason: e.to_string(),
            })?;

        Ok(uid)
    }

    /// Link state for one provider, for the account settings menu.
    pub async fn association_state(
        &self,
        provider: &str,
        uid: Uid,
    ) -> Result<AssociationState, CoordinationError> {
        let descriptor = self.descriptor(provider)?;
        let field = external_id_field(&descriptor.name);
        let associated = self.users.get_user_field(uid, &field).await?.is_some();

        let url = if associated {
            format!("{}/deauth/{}", Self::route_base(), descriptor.name)
        } else {
            format!("{}/auth/{}", Self::route_base(), descriptor.name)
        };

        Ok(AssociationState {
            name: descriptor.name.clone(),
            icon: descriptor.icon.clone(),
            associated,
            url,
        })
    }

    /// Link state for every registered provider.
    pub async fn association_states(
        &self,
        uid: Uid,
    ) -> Result<Vec<AssociationState>, CoordinationError> {
        let mut names: Vec<_> = self.registry.names().map(str::to_string).collect();
        names.sort();

        let mut states = Vec::with_capacity(names.len());
        for name in names {
            states.push(self.association_state(&name, uid).await?);
        }
        Ok(states)
    }

    /// Login-page entries for every provider whose credentials are
    /// configured. Unconfigured providers are skipped, not errors.
    pub async fn strategy_entries(&self) -> Result<Vec<StrategyEntry>, CoordinationError> {
        let mut names: Vec<_> = self.registry.names().map(str::to_string).collect();
        names.sort();

        let mut entries = Vec::new();
        for name in names {
            let Some(descriptor) = self.registry.get(&name) else {
                continue;
            };
            let settings = self.settings.settings(&descriptor.settings_key()).await?;
            if !settings.is_configured() {
                continue;
            }
            entries.push(StrategyEntry {
                name: descriptor.name.clone(),
                url: format!("{}/auth/{}", Self::route_base(), descriptor.name),
                callback_url: self.callback_url(&descriptor.name)?,
                icon: descriptor.icon.clone(),
                logo: settings.sso_logo,
                scope: descriptor.scope.clone(),
            });
        }
        Ok(entries)
    }
}
