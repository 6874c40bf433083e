//! Store trait definition.

use crate::UsagePatch;
use bluebox_error::BlueboxResult;
use bluebox_tier::UsageRecord;
use tokio::sync::broadcast;

/// A usage record after a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageChange {
    /// Owner of the record
    pub user_id: String,
    /// Record as stored after the write
    pub record: UsageRecord,
}

/// Trait for pluggable usage record backends.
///
/// Writes are last-writer-wins per field; concurrent increments may be lost or
/// doubled, and callers accept at-least-once counting.
#[async_trait::async_trait]
pub trait UsageStore: Send + Sync {
    /// Read the record for `user_id`, if one exists.
    async fn get(&self, user_id: &str) -> BlueboxResult<Option<UsageRecord>>;

    /// Overwrite only the fields set in `patch`.
    ///
    /// Creates the record when it is absent and `patch` sets every required
    /// field; otherwise an absent record is a `NotFound` error.
    async fn merge(&self, user_id: &str, patch: UsagePatch) -> BlueboxResult<UsageRecord>;

    /// Replace the whole record.
    async fn put(&self, user_id: &str, record: UsageRecord) -> BlueboxResult<()>;

    /// Receive every subsequent write.
    fn subscribe(&self) -> broadcast::Receiver<UsageChange>;
}
