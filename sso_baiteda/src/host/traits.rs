//! Interfaces of the host forum consumed by the SSO core.
//!
//! The forum owns users, durable objects, settings, and sessions; the core
//! only talks to these traits so it can run against any host (the in-memory
//! host in tests and the demo, SQLite in a standalone deployment).

use std::collections::HashMap;

use async_trait::async_trait;

use super::errors::{StoreError, UserError};
use super::types::{NewUser, SessionRecord, SsoSettings, Uid};

/// The host's user system.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user_field(&self, uid: Uid, field: &str) -> Result<Option<String>, UserError>;

    async fn set_user_field(&self, uid: Uid, field: &str, value: &str) -> Result<(), UserError>;

    async fn delete_user_field(&self, uid: Uid, field: &str) -> Result<(), UserError>;

    async fn get_user_fields(
        &self,
        uid: Uid,
        fields: &[&str],
    ) -> Result<HashMap<String, String>, UserError>;

    async fn get_uid_by_email(&self, email: &str) -> Result<Option<Uid>, UserError>;

    /// Mint a new local account through the host's user factory.
    async fn create(&self, new_user: NewUser) -> Result<Uid, UserError>;

    /// Mark the account's email address verified without a confirmation
    /// round-trip.
    async fn confirm_email_by_uid(&self, uid: Uid) -> Result<(), UserError>;
}

/// The host's generic durable key/value object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_object_field(
        &self,
        object: &str,
        field: &str,
    ) -> Result<Option<String>, StoreError>;

    async fn set_object_field(
        &self,
        object: &str,
        field: &str,
        value: &str,
    ) -> Result<(), StoreError>;

    async fn delete_object_field(&self, object: &str, field: &str) -> Result<(), StoreError>;
}

/// The host's plugin-settings store.
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    /// Load the settings payload persisted under `plugin_key`. Missing
    /// settings come back as the (unconfigured) default payload.
    async fn settings(&self, plugin_key: &str) -> Result<SsoSettings, StoreError>;
}

/// The host's authenticated-session layer.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn session(&self, cookie: &str) -> Result<Option<SessionRecord>, StoreError>;

    /// Establish a session for `uid`, returning the cookie value to hand to
    /// the browser.
    async fn create_session(&self, uid: Uid) -> Result<String, StoreError>;
}
