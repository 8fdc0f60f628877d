//! SQLite-backed host implementation for standalone deployments.
//!
//! Forums embedding this crate normally supply their own repositories; this
//! implementation exists so the integration can run against a plain SQLite
//! file without a host platform around it.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};

use super::errors::{StoreError, UserError};
use super::traits::{ObjectStore, SettingsProvider, UserRepository};
use super::types::{NewUser, SsoSettings, Uid};

const TABLE_USERS: &str = "sso_users";
const TABLE_OBJECTS: &str = "sso_objects";
const SETTINGS_OBJECT: &str = "plugin:settings";

/// User columns reachable through the generic field accessors. The schema is
/// fixed; extend this list alongside the table definition.
const USER_FIELD_COLUMNS: &[&str] = &["username", "email", "fullname", "baitedaid"];

#[derive(Debug, Clone)]
pub struct SqliteHost {
    pool: Pool<Sqlite>,
}

impl SqliteHost {
    /// Open (or create) the database at `url`.
    ///
    /// A single connection keeps writes serialized and makes in-memory
    /// databases coherent across calls.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(Self { pool })
    }

    pub async fn init_tables(&self) -> Result<(), StoreError> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {TABLE_USERS} (
                uid INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                email TEXT NOT NULL,
                fullname TEXT,
                baitedaid TEXT,
                email_confirmed INTEGER NOT NULL DEFAULT 0,
                joindate TIMESTAMP NOT NULL
            )
            "#
        ))
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(e.to_string()))?;

        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {TABLE_OBJECTS} (
                object TEXT NOT NULL,
                field TEXT NOT NULL,
                value TEXT NOT NULL,
                PRIMARY KEY (object, field)
            )
            "#
        ))
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(())
    }

    /// Persist a settings payload where [`SettingsProvider::settings`] will
    /// find it.
    pub async fn put_settings(
        &self,
        plugin_key: &str,
        settings: &SsoSettings,
    ) -> Result<(), StoreError> {
        let payload = serde_json::to_string(settings)?;
        self.set_object_field(SETTINGS_OBJECT, plugin_key, &payload)
            .await
    }

    fn user_column(field: &str) -> Result<&str, UserError> {
        USER_FIELD_COLUMNS
            .iter()
            .find(|&&column| column == field)
            .copied()
            .ok_or_else(|| UserError::InvalidData(format!("unknown user field: {field}")))
    }
}

#[async_trait]
impl UserRepository for SqliteHost {
    async fn get_user_field(&self, uid: Uid, field: &str) -> Result<Option<String>, UserError> {
        let column = Self::user_column(field)?;

        let value: Option<Option<String>> = sqlx::query_scalar(&format!(
            "SELECT {column} FROM {TABLE_USERS} WHERE uid = ?"
        ))
        .bind(uid)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::Storage(e.to_string()))?;

        match value {
            Some(value) => Ok(value),
            None => Err(UserError::NotFound),
        }
    }

    async fn set_user_field(&self, uid: Uid, field: &str, value: &str) -> Result<(), UserError> {
        let column = Self::user_column(field)?;

        let result = sqlx::query(&format!(
            "UPDATE {TABLE_USERS} SET {column} = ? WHERE uid = ?"
        ))
        .bind(value)
        .bind(uid)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::Storage(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound);
        }
        Ok(())
    }

    async fn delete_user_field(&self, uid: Uid, field: &str) -> Result<(), UserError> {
        let column = Self::user_column(field)?;

        let result = sqlx::query(&format!(
            "UPDATE {TABLE_USERS} SET {column} = NULL WHERE uid = ?"
        ))
        .bind(uid)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::Storage(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound);
        }
        Ok(())
    }

    async fn get_user_fields(
        &self,
        uid: Uid,
        fields: &[&str],
    ) -> Result<HashMap<String, String>, UserError> {
        let mut values = HashMap::new();
        for &field in fields {
            if let Some(value) = self.get_user_field(uid, field).await? {
                values.insert(field.to_string(), value);
            }
        }
        Ok(values)
    }

    async fn get_uid_by_email(&self, email: &str) -> Result<Option<Uid>, UserError> {
        sqlx::query_scalar(&format!(
            "SELECT uid FROM {TABLE_USERS} WHERE email = ? ORDER BY uid LIMIT 1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::Storage(e.to_string()))
    }

    async fn create(&self, new_user: NewUser) -> Result<Uid, UserError> {
        if new_user.username.is_empty() {
            return Err(UserError::InvalidData("username is empty".to_string()));
        }

        let result = sqlx::query(&format!(
            "INSERT INTO {TABLE_USERS} (username, email, joindate) VALUES (?, ?, ?)"
        ))
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::Storage(e.to_string()))?;

        Ok(result.last_insert_rowid())
    }

    async fn confirm_email_by_uid(&self, uid: Uid) -> Result<(), UserError> {
        let result = sqlx::query(&format!(
            "UPDATE {TABLE_USERS} SET email_confirmed = 1 WHERE uid = ?"
        ))
        .bind(uid)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::Storage(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for SqliteHost {
    async fn get_object_field(
        &self,
        object: &str,
        field: &str,
    ) -> Result<Option<String>, StoreError> {
        sqlx::query_scalar(&format!(
            "SELECT value FROM {TABLE_OBJECTS} WHERE object = ? AND field = ?"
        ))
        .bind(object)
        .bind(field)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(e.to_string()))
    }

    async fn set_object_field(
        &self,
        object: &str,
        field: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        sqlx::query(&format!(
            r#"
            INSERT INTO {TABLE_OBJECTS} (object, field, value)
            VALUES (?, ?, ?)
            ON CONFLICT (object, field) DO UPDATE SET value = excluded.value
            "#
        ))
        .bind(object)
        .bind(field)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(())
    }

    async fn delete_object_field(&self, object: &str, field: &str) -> Result<(), StoreError> {
        sqlx::query(&format!(
            "DELETE FROM {TABLE_OBJECTS} WHERE object = ? AND field = ?"
        ))
        .bind(object)
        .bind(field)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl SettingsProvider for SqliteHost {
    async fn settings(&self, plugin_key: &str) -> Result<SsoSettings, StoreError> {
        match self.get_object_field(SETTINGS_OBJECT, plugin_key).await? {
            Some(payload) => Ok(serde_json::from_str(&payload)?),
            None => Ok(SsoSettings::default()),
        }
    }
}
