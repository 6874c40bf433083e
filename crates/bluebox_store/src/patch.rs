//! Partial updates to a usage record.

use bluebox_core::ModelTier;
use bluebox_tier::{AccountRole, BillingCycle, UsageLimit, UsageRecord};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Field-level update; `None` leaves a field untouched.
///
/// Optional record fields use a nested `Option` so a patch can clear them.
///
/// ```
/// use bluebox_store::UsagePatch;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
/// let patch = UsagePatch::default()
///     .with_daily_message_count(Some(0))
///     .with_last_usage_reset(Some(today));
/// assert!(!patch.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_setters::Setters)]
#[setters(prefix = "with_")]
#[serde(rename_all = "camelCase")]
pub struct UsagePatch {
    /// New email
    pub email: Option<Option<String>>,
    /// New role
    pub role: Option<AccountRole>,
    /// New daily message cap
    pub message_limit: Option<UsageLimit>,
    /// New daily token cap
    pub token_limit: Option<UsageLimit>,
    /// New model tier
    pub model_tier: Option<ModelTier>,
    /// New message counter
    pub daily_message_count: Option<u64>,
    /// New token counter
    pub daily_token_count: Option<u64>,
    /// New reset day
    pub last_usage_reset: Option<NaiveDate>,
    /// New (or cleared) subscription expiry
    pub subscription_expiry: Option<Option<DateTime<Utc>>>,
    /// New (or cleared) billing cycle
    pub billing_cycle: Option<Option<BillingCycle>>,
    /// New (or cleared) payment id
    pub last_payment_id: Option<Option<String>>,
}

impl UsagePatch {
    /// Patch that rewrites every field of `record`.
    pub fn from_record(record: &UsageRecord) -> Self {
        Self {
            email: Some(record.email.clone()),
            role: Some(record.role),
            message_limit: Some(record.message_limit),
            token_limit: Some(record.token_limit),
            model_tier: Some(record.model_tier),
            daily_message_count: Some(record.daily_message_count),
            daily_token_count: Some(record.daily_token_count),
            last_usage_reset: Some(record.last_usage_reset),
            subscription_expiry: Some(record.subscription_expiry),
            billing_cycle: Some(record.billing_cycle),
            last_payment_id: Some(record.last_payment_id.clone()),
        }
    }

    /// Patch for the fields that differ between `before` and `after`.
    pub fn diff(before: &UsageRecord, after: &UsageRecord) -> Self {
        fn changed<T: PartialEq + Clone>(a: &T, b: &T) -> Option<T> {
            (a != b).then(|| b.clone())
        }
        Self {
            email: changed(&before.email, &after.email),
            role: changed(&before.role, &after.role),
            message_limit: changed(&before.message_limit, &after.message_limit),
            token_limit: changed(&before.token_limit, &after.token_limit),
            model_tier: changed(&before.model_tier, &after.model_tier),
            daily_message_count: changed(&before.daily_message_count, &after.daily_message_count),
            daily_token_count: changed(&before.daily_token_count, &after.daily_token_count),
            last_usage_reset: changed(&before.last_usage_reset, &after.last_usage_reset),
            subscription_expiry: changed(&before.subscription_expiry, &after.subscription_expiry),
            billing_cycle: changed(&before.billing_cycle, &after.billing_cycle),
            last_payment_id: changed(&before.last_payment_id, &after.last_payment_id),
        }
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply onto an existing record.
    pub fn apply(self, record: &mut UsageRecord) {
        if let Some(email) = self.email {
            record.email = email;
        }
        if let Some(role) = self.role {
            record.role = role;
        }
        if let Some(limit) = self.message_limit {
            record.message_limit = limit;
        }
        if let Some(limit) = self.token_limit {
            record.token_limit = limit;
        }
        if let Some(tier) = self.model_tier {
            record.model_tier = tier;
        }
        if let Some(count) = self.daily_message_count {
            record.daily_message_count = count;
        }
        if let Some(count) = self.daily_token_count {
            record.daily_token_count = count;
        }
        if let Some(day) = self.last_usage_reset {
            record.last_usage_reset = day;
        }
        if let Some(expiry) = self.subscription_expiry {
            record.subscription_expiry = expiry;
        }
        if let Some(cycle) = self.billing_cycle {
            record.billing_cycle = cycle;
        }
        if let Some(payment_id) = self.last_payment_id {
            record.last_payment_id = payment_id;
        }
    }

    /// Build a new record when every required field is set.
    pub fn into_record(self) -> Option<UsageRecord> {
        Some(UsageRecord {
            email: self.email.flatten(),
            role: self.role?,
            message_limit: self.message_limit?,
            token_limit: self.token_limit?,
            model_tier: self.model_tier?,
            daily_message_count: self.daily_message_count.unwrap_or_default(),
            daily_token_count: self.daily_token_count.unwrap_or_default(),
            last_usage_reset: self.last_usage_reset?,
            subscription_expiry: self.subscription_expiry.flatten(),
            billing_cycle: self.billing_cycle.flatten(),
            last_payment_id: self.last_payment_id.flatten(),
        })
    }
}
