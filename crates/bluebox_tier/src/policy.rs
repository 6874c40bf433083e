//! Pure allow/deny decisions over a usage record.

use crate::{AccountRole, PlansConfig, UsageRecord};
use bluebox_error::{TierError, TierErrorKind};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outcome of evaluating a record against today's date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Whether one more message is permitted
    pub allowed: bool,
    /// Message count the decision was made against
    pub effective_count: u64,
    /// Token count the decision was made against
    pub effective_token_count: u64,
    /// Whether the stored counters belong to an earlier day
    pub reset_needed: bool,
}

/// Decide whether `usage` may send another message on `today`.
///
/// Counters stamped with an earlier day are treated as zero. The stored record
/// is not modified; persisting the reset is the caller's job.
///
/// ```
/// use bluebox_tier::{PlansConfig, UsageRecord, evaluate};
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
/// let mut usage = UsageRecord::new_free(None, today, &PlansConfig::default().free);
/// usage.daily_message_count = 25;
/// assert!(!evaluate(&usage, today).allowed);
///
/// let tomorrow = today.succ_opt().unwrap();
/// let next_day = evaluate(&usage, tomorrow);
/// assert!(next_day.allowed);
/// assert_eq!(next_day.effective_count, 0);
/// ```
pub fn evaluate(usage: &UsageRecord, today: NaiveDate) -> Evaluation {
    let reset_needed = usage.last_usage_reset != today;
    let (effective_count, effective_token_count) = if reset_needed {
        (0, 0)
    } else {
        (usage.daily_message_count, usage.daily_token_count)
    };

    let allowed = match usage.role {
        AccountRole::Pro => true,
        AccountRole::Free => usage.message_limit.permits(effective_count),
    };

    Evaluation {
        allowed,
        effective_count,
        effective_token_count,
        reset_needed,
    }
}

/// Revert a lapsed pro subscription to the free plan.
///
/// Returns `true` when the record was changed. A pro record without an expiry
/// never lapses.
pub fn downgrade_if_expired(
    usage: &mut UsageRecord,
    now: DateTime<Utc>,
    plans: &PlansConfig,
) -> bool {
    let expired = usage.role == AccountRole::Pro
        && usage.subscription_expiry.is_some_and(|expiry| now > expiry);
    if !expired {
        return false;
    }

    debug!(expiry = ?usage.subscription_expiry, "Subscription lapsed, downgrading to free");
    usage.role = AccountRole::Free;
    usage.message_limit = plans.free.message_limit;
    usage.token_limit = plans.free.token_limit;
    usage.model_tier = plans.free.model_tier;
    usage.subscription_expiry = None;
    usage.billing_cycle = None;
    true
}

/// Expiry check followed by evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    /// The record after any downgrade
    pub record: UsageRecord,
    /// Whether the subscription lapsed during this assessment
    pub downgraded: bool,
    /// Decision made against `record`
    pub evaluation: Evaluation,
}

impl Assessment {
    /// Fail with `LimitReached` when the message is not permitted.
    #[track_caller]
    pub fn require_allowed(&self) -> Result<(), TierError> {
        if self.evaluation.allowed {
            return Ok(());
        }
        let limit = self.record.message_limit.as_count().unwrap_or_default();
        Err(TierError::new(TierErrorKind::LimitReached(limit)))
    }
}

/// Downgrade if the subscription lapsed, then evaluate against `now`'s date.
pub fn assess(usage: &UsageRecord, now: DateTime<Utc>, plans: &PlansConfig) -> Assessment {
    let mut record = usage.clone();
    let downgraded = downgrade_if_expired(&mut record, now, plans);
    let evaluation = evaluate(&record, now.date_naive());
    Assessment {
        record,
        downgraded,
        evaluation,
    }
}

/// Count an accepted message, applying a pending daily reset first.
pub fn record_accepted_message(usage: &mut UsageRecord, today: NaiveDate, tokens: u64) {
    if usage.last_usage_reset != today {
        usage.daily_message_count = 0;
        usage.daily_token_count = 0;
        usage.last_usage_reset = today;
    }
    usage.daily_message_count = usage.daily_message_count.saturating_add(1);
    usage.daily_token_count = usage.daily_token_count.saturating_add(tokens);
}
