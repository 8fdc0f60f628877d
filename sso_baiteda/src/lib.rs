//! sso-baiteda - Baiteda single sign-on integration for forum platforms
//!
//! This crate authenticates a user against the baiteda user-center service,
//! maps the external account onto a local forum account, and manages the
//! lifecycle of that link: first-login creation, returning-user lookup,
//! email-based merging, and unlinking.
//!
//! The host forum is consumed through the [`UserRepository`], [`ObjectStore`],
//! [`SettingsProvider`], and [`SessionStore`] traits; everything else is
//! owned here. Construct a [`ProviderRegistry`] once at
//! startup, hand it to a [`SsoCoordinator`] together with the host handles,
//! and mount the routing layer on top.

mod association;
mod config;
mod coordination;
mod host;
mod oauth2;
mod provider;

pub use association::{AssociationStore, external_id_field};
pub use config::{FORUM_BASE_URL, SSO_ROUTE_PREFIX};
pub use coordination::{
    AssociationState, CoordinationError, Reconciled, SsoCoordinator, StrategyEntry,
};
pub use host::{
    MemoryHost, NewUser, ObjectStore, SessionRecord, SessionStore, SettingsProvider, SqliteHost,
    SsoSettings, StoreError, Toggle, Uid, UserError, UserRepository,
};
pub use oauth2::{NormalizedProfile, OAuth2Error, TokenGrant, TokenSet, normalize_profile};
pub use provider::{ProviderDescriptor, ProviderRegistry, TokenRequestStyle};
