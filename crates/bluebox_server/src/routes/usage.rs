use crate::{ApiError, AppState};
use axum::{
    Json,
    extract::{Path, State},
};
use bluebox_store::UsagePatch;
use bluebox_tier::{Assessment, UsageRecord, assess, record_accepted_message};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Usage decision returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStatus {
    /// Whether another message is permitted today
    pub allowed: bool,
    /// Messages left today; absent for unlimited plans
    pub remaining: Option<u64>,
    /// Whether a lapsed subscription was reverted by this request
    pub downgraded: bool,
    /// Record as stored after this request
    pub usage: UsageRecord,
}

impl UsageStatus {
    fn from_record(usage: UsageRecord, allowed: bool, downgraded: bool) -> Self {
        let remaining = usage
            .message_limit
            .as_count()
            .map(|limit| limit.saturating_sub(usage.daily_message_count));
        Self {
            allowed,
            remaining,
            downgraded,
            usage,
        }
    }
}

/// Body of `POST /api/usage/{user_id}/messages`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub(crate) struct MessageUsage {
    #[serde(default)]
    tokens: u64,
}

/// `GET /api/usage/{user_id}`: evaluate without counting a message.
#[instrument(skip(state))]
pub(crate) async fn usage_status(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UsageStatus>, ApiError> {
    let now = Utc::now();
    let (stored, assessment) = load(&state, &user_id, now).await?;
    let settled = settle(&assessment, now);
    persist(&state, &user_id, stored.as_ref(), &settled).await?;

    Ok(Json(UsageStatus::from_record(
        settled,
        assessment.evaluation.allowed,
        assessment.downgraded,
    )))
}

/// `POST /api/usage/{user_id}/messages`: count one message or refuse with 429.
#[instrument(skip(state, body))]
pub(crate) async fn record_message(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Option<Json<MessageUsage>>,
) -> Result<Json<UsageStatus>, ApiError> {
    let now = Utc::now();
    let tokens = body.map(|Json(body)| body.tokens).unwrap_or_default();
    let (stored, assessment) = load(&state, &user_id, now).await?;

    if let Err(e) = assessment.require_allowed() {
        if assessment.downgraded {
            persist(&state, &user_id, stored.as_ref(), &assessment.record).await?;
        }
        info!(%user_id, "Daily message limit reached");
        return Err(e.into());
    }

    let mut updated = assessment.record.clone();
    record_accepted_message(&mut updated, now.date_naive(), tokens);
    persist(&state, &user_id, stored.as_ref(), &updated).await?;

    let allowed = bluebox_tier::evaluate(&updated, now.date_naive()).allowed;
    Ok(Json(UsageStatus::from_record(
        updated,
        allowed,
        assessment.downgraded,
    )))
}

/// Stored record (if any) and the assessment of it, or of fresh free defaults.
async fn load(
    state: &AppState,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<(Option<UsageRecord>, Assessment), ApiError> {
    let stored = state.store.get(user_id).await?;
    let base = stored.clone().unwrap_or_else(|| {
        debug!(user_id, "No usage record, using free plan defaults");
        UsageRecord::new_free(None, now.date_naive(), &state.tier.plans.free)
    });
    let assessment = assess(&base, now, &state.tier.plans);
    Ok((stored, assessment))
}

/// Assessed record with any pending daily reset applied.
fn settle(assessment: &Assessment, now: DateTime<Utc>) -> UsageRecord {
    let mut record = assessment.record.clone();
    if assessment.evaluation.reset_needed {
        record.daily_message_count = 0;
        record.daily_token_count = 0;
        record.last_usage_reset = now.date_naive();
    }
    record
}

/// Write only what changed; create the record when it did not exist.
async fn persist(
    state: &AppState,
    user_id: &str,
    stored: Option<&UsageRecord>,
    target: &UsageRecord,
) -> Result<(), ApiError> {
    match stored {
        None => state.store.put(user_id, target.clone()).await?,
        Some(before) => {
            let patch = UsagePatch::diff(before, target);
            if !patch.is_empty() {
                state.store.merge(user_id, patch).await?;
            }
        }
    }
    Ok(())
}
