//! In-memory usage store.

use crate::{UsageChange, UsagePatch, UsageStore};
use bluebox_error::{BlueboxResult, StoreError, StoreErrorKind};
use bluebox_tier::UsageRecord;
use std::collections::HashMap;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, instrument};

const CHANNEL_CAPACITY: usize = 64;

/// Process-local store backed by a map, with change broadcast.
#[derive(Debug)]
pub struct InMemoryUsageStore {
    records: RwLock<HashMap<String, UsageRecord>>,
    changes: broadcast::Sender<UsageChange>,
}

impl Default for InMemoryUsageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUsageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            records: RwLock::new(HashMap::new()),
            changes,
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn notify(&self, user_id: &str, record: &UsageRecord) {
        // No subscribers is not an error.
        let _ = self.changes.send(UsageChange {
            user_id: user_id.to_string(),
            record: record.clone(),
        });
    }
}

#[async_trait::async_trait]
impl UsageStore for InMemoryUsageStore {
    #[instrument(skip(self))]
    async fn get(&self, user_id: &str) -> BlueboxResult<Option<UsageRecord>> {
        Ok(self.records.read().await.get(user_id).cloned())
    }

    #[instrument(skip(self, patch))]
    async fn merge(&self, user_id: &str, patch: UsagePatch) -> BlueboxResult<UsageRecord> {
        let mut records = self.records.write().await;
        let record = match records.get_mut(user_id) {
            Some(existing) => {
                patch.apply(existing);
                existing.clone()
            }
            None => {
                let created = patch.into_record().ok_or_else(|| {
                    StoreError::new(StoreErrorKind::NotFound(user_id.to_string()))
                })?;
                records.insert(user_id.to_string(), created.clone());
                created
            }
        };
        drop(records);

        debug!("Merged usage record");
        self.notify(user_id, &record);
        Ok(record)
    }

    #[instrument(skip(self, record))]
    async fn put(&self, user_id: &str, record: UsageRecord) -> BlueboxResult<()> {
        self.records
            .write()
            .await
            .insert(user_id.to_string(), record.clone());
        debug!("Stored usage record");
        self.notify(user_id, &record);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<UsageChange> {
        self.changes.subscribe()
    }
}
