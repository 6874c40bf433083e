//! Per-account usage record and its field types.

use crate::PlanConfig;
use bluebox_core::ModelTier;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Subscription role of an account.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    /// Capped daily usage
    #[default]
    #[display("free")]
    Free,
    /// Paid subscription
    #[display("pro")]
    Pro,
}

/// A daily cap that may be absent.
///
/// Stored as an integer, or as the string `"unlimited"`.
///
/// ```
/// use bluebox_tier::UsageLimit;
///
/// let limit: UsageLimit = serde_json::from_str("25").unwrap();
/// assert_eq!(limit, UsageLimit::Limited(25));
/// let limit: UsageLimit = serde_json::from_str("\"unlimited\"").unwrap();
/// assert!(limit.permits(u64::MAX));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "LimitRepr", into = "LimitRepr")]
pub enum UsageLimit {
    /// At most this many per day
    Limited(u64),
    /// No cap
    Unlimited,
}

impl UsageLimit {
    /// Whether one more unit is permitted when `used` have been consumed.
    pub fn permits(&self, used: u64) -> bool {
        match self {
            UsageLimit::Limited(limit) => used < *limit,
            UsageLimit::Unlimited => true,
        }
    }

    /// The numeric cap, if any.
    pub fn as_count(&self) -> Option<u64> {
        match self {
            UsageLimit::Limited(limit) => Some(*limit),
            UsageLimit::Unlimited => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum LimitRepr {
    Count(u64),
    Word(String),
}

impl TryFrom<LimitRepr> for UsageLimit {
    type Error = String;

    fn try_from(repr: LimitRepr) -> Result<Self, Self::Error> {
        match repr {
            LimitRepr::Count(limit) => Ok(UsageLimit::Limited(limit)),
            LimitRepr::Word(word) if word.eq_ignore_ascii_case("unlimited") => {
                Ok(UsageLimit::Unlimited)
            }
            LimitRepr::Word(word) => Err(format!("invalid usage limit: {word}")),
        }
    }
}

impl From<UsageLimit> for LimitRepr {
    fn from(limit: UsageLimit) -> Self {
        match limit {
            UsageLimit::Limited(limit) => LimitRepr::Count(limit),
            UsageLimit::Unlimited => LimitRepr::Word("unlimited".to_string()),
        }
    }
}

/// Length of a paid subscription term.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    /// One month
    #[default]
    #[display("monthly")]
    Monthly,
    /// One year
    #[display("yearly")]
    Yearly,
}

impl BillingCycle {
    /// Parse a payment note. Anything other than `"yearly"` is monthly.
    pub fn from_note(note: Option<&str>) -> Self {
        match note {
            Some("yearly") => BillingCycle::Yearly,
            _ => BillingCycle::Monthly,
        }
    }
}

/// Usage counters and subscription metadata for one account.
///
/// Field names match the stored document layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    /// Account email, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Subscription role
    pub role: AccountRole,
    /// Daily message cap
    pub message_limit: UsageLimit,
    /// Daily token cap
    pub token_limit: UsageLimit,
    /// Model tier granted by the plan
    pub model_tier: ModelTier,
    /// Messages counted since `last_usage_reset`
    #[serde(default)]
    pub daily_message_count: u64,
    /// Tokens counted since `last_usage_reset`
    #[serde(default)]
    pub daily_token_count: u64,
    /// Day the counters were last zeroed
    pub last_usage_reset: NaiveDate,
    /// End of the paid term; meaningful only for pro accounts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_expiry: Option<DateTime<Utc>>,
    /// Term length of the current subscription
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_cycle: Option<BillingCycle>,
    /// Identifier of the payment that granted the current term
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_payment_id: Option<String>,
}

impl UsageRecord {
    /// First-session defaults for a new account on the free plan.
    pub fn new_free(email: Option<String>, today: NaiveDate, free: &PlanConfig) -> Self {
        Self {
            email,
            role: AccountRole::Free,
            message_limit: free.message_limit,
            token_limit: free.token_limit,
            model_tier: free.model_tier,
            daily_message_count: 0,
            daily_token_count: 0,
            last_usage_reset: today,
            subscription_expiry: None,
            billing_cycle: None,
            last_payment_id: None,
        }
    }
}
