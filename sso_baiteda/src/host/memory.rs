//! In-memory host implementation used by tests and the demo application.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::errors::{StoreError, UserError};
use super::traits::{ObjectStore, SessionStore, SettingsProvider, UserRepository};
use super::types::{NewUser, SessionRecord, SsoSettings, Uid};

/// A complete in-process host: users, objects, settings, and sessions.
#[derive(Debug, Default)]
pub struct MemoryHost {
    users: RwLock<HashMap<Uid, HashMap<String, String>>>,
    next_uid: AtomicI64,
    objects: RwLock<HashMap<String, HashMap<String, String>>>,
    settings: RwLock<HashMap<String, SsoSettings>>,
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            next_uid: AtomicI64::new(1),
            ..Self::default()
        }
    }

    pub async fn put_settings(&self, plugin_key: &str, settings: SsoSettings) {
        self.settings
            .write()
            .await
            .insert(plugin_key.to_string(), settings);
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserRepository for MemoryHost {
    async fn get_user_field(&self, uid: Uid, field: &str) -> Result<Option<String>, UserError> {
        let users = self.users.read().await;
        let user = users.get(&uid).ok_or(UserError::NotFound)?;
        Ok(user.get(field).cloned())
    }

    async fn set_user_field(&self, uid: Uid, field: &str, value: &str) -> Result<(), UserError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&uid).ok_or(UserError::NotFound)?;
        user.insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn delete_user_field(&self, uid: Uid, field: &str) -> Result<(), UserError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&uid).ok_or(UserError::NotFound)?;
        user.remove(field);
        Ok(())
    }

    async fn get_user_fields(
        &self,
        uid: Uid,
        fields: &[&str],
    ) -> Result<HashMap<String, String>, UserError> {
        let users = self.users.read().await;
        let user = users.get(&uid).ok_or(UserError::NotFound)?;
        Ok(fields
            .iter()
            .filter_map(|&field| {
                user.get(field)
                    .map(|value| (field.to_string(), value.clone()))
            })
            .collect())
    }

    async fn get_uid_by_email(&self, email: &str) -> Result<Option<Uid>, UserError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|(_, fields)| fields.get("email").map(String::as_str) == Some(email))
            .map(|(&uid, _)| uid)
            .min())
    }

    async fn create(&self, new_user: NewUser) -> Result<Uid, UserError> {
        if new_user.username.is_empty() {
            return Err(UserError::InvalidData("username is empty".to_string()));
        }

        let uid = self.next_uid.fetch_add(1, Ordering::SeqCst);
        let mut fields = HashMap::new();
        fields.insert("username".to_string(), new_user.username);
        fields.insert("email".to_string(), new_user.email);
        fields.insert(
            "joindate".to_string(),
            Utc::now().timestamp_millis().to_string(),
        );

        self.users.write().await.insert(uid, fields);
        Ok(uid)
    }

    async fn confirm_email_by_uid(&self, uid: Uid) -> Result<(), UserError> {
        self.set_user_field(uid, "email:confirmed", "1").await
    }
}

#[async_trait]
impl ObjectStore for MemoryHost {
    async fn get_object_field(
        &self,
        object: &str,
        field: &str,
    ) -> Result<Option<String>, StoreError> {
        let objects = self.objects.read().await;
        Ok(objects
            .get(object)
            .and_then(|fields| fields.get(field))
            .cloned())
    }

    async fn set_object_field(
        &self,
        object: &str,
        field: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        let mut objects = self.objects.write().await;
        objects
            .entry(object.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn delete_object_field(&self, object: &str, field: &str) -> Result<(), StoreError> {
        let mut objects = self.objects.write().await;
        if let Some(fields) = objects.get_mut(object) {
            fields.remove(field);
        }
        Ok(())
    }
}

#[async_trait]
impl SettingsProvider for MemoryHost {
    async fn settings(&self, plugin_key: &str) -> Result<SsoSettings, StoreError> {
        let settings = self.settings.read().await;
        Ok(settings.get(plugin_key).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl SessionStore for MemoryHost {
    async fn session(&self, cookie: &str) -> Result<Option<SessionRecord>, StoreError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(cookie).cloned())
    }

    async fn create_session(&self, uid: Uid) -> Result<String, StoreError> {
        let cookie = Uuid::new_v4().to_string();
        let record = SessionRecord {
            uid,
            csrf_token: Uuid::new_v4().to_string(),
        };
        self.sessions.write().await.insert(cookie.clone(), record);
        Ok(cookie)
    }
}
