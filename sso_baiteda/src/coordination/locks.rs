//! Per-key serialization for reconciliation.
//!
//! Two concurrent first logins for the same external id must not both pass
//! the association "not found" check; holding a per-external-id mutex for
//! the duration of reconciliation makes the sequence single-flight within
//! this process. Cross-process races are out of scope here.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub(crate) struct KeyedLocks {
    // Entries are never reaped; the set of external ids seen by one process
    // stays small.
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyedLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.inner.lock().await;
            locks
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
