//! Durable mapping between external identities and local user ids.
//!
//! The forward side (`external id -> uid`) lives in the host object store
//! under one object per provider; the inverse side (`uid -> external id`) is
//! a field on the user record, written and cleared by the coordination
//! layer. There is no transaction spanning the two writes.

use std::sync::Arc;

use crate::host::{ObjectStore, StoreError, Uid};

/// Forward-association store for one provider.
#[derive(Clone)]
pub struct AssociationStore {
    store: Arc<dyn ObjectStore>,
    object: String,
}

impl AssociationStore {
    pub fn new(store: Arc<dyn ObjectStore>, provider_name: &str) -> Self {
        Self {
            store,
            object: format!("{provider_name}id:uid"),
        }
    }

    pub async fn get(&self, external_id: &str) -> Result<Option<Uid>, StoreError> {
        match self.store.get_object_field(&self.object, external_id).await? {
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| StoreError::InvalidData(format!("association holds non-uid value: {raw}"))),
            None => Ok(None),
        }
    }

    pub async fn set(&self, external_id: &str, uid: Uid) -> Result<(), StoreError> {
        self.store
            .set_object_field(&self.object, external_id, &uid.to_string())
            .await
    }

    pub async fn remove(&self, external_id: &str) -> Result<(), StoreError> {
        self.store.delete_object_field(&self.object, external_id).await
    }
}

/// User-record field carrying the inverse link for `provider_name`.
pub fn external_id_field(provider_name: &str) -> String {
    format!("{provider_name}id")
}
