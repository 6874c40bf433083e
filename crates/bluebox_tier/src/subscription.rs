//! Subscription upgrades from captured payments.

use crate::{AccountRole, BillingConfig, BillingCycle, PlansConfig, UsageRecord};
use chrono::{DateTime, Duration, Utc};
use tracing::{info, instrument};

/// Upgrade `usage` to the pro plan for one billing term starting at `now`.
///
/// The term replaces any remaining time on a previous subscription. Counters
/// are left alone.
#[instrument(skip(usage, plans, billing), fields(cycle = %cycle))]
pub fn apply_payment_capture(
    usage: &mut UsageRecord,
    cycle: BillingCycle,
    payment_id: &str,
    now: DateTime<Utc>,
    plans: &PlansConfig,
    billing: &BillingConfig,
) {
    let expiry = now + Duration::days(billing.days(cycle));
    usage.role = AccountRole::Pro;
    usage.message_limit = plans.pro.message_limit;
    usage.token_limit = plans.pro.token_limit;
    usage.model_tier = plans.pro.model_tier;
    usage.subscription_expiry = Some(expiry);
    usage.billing_cycle = Some(cycle);
    usage.last_payment_id = Some(payment_id.to_string());
    info!(%expiry, "Upgraded account to pro");
}
