//! Tests for the tier policy evaluator.

use bluebox_core::ModelTier;
use bluebox_tier::{
    AccountRole, BillingConfig, BillingCycle, PlansConfig, UsageLimit, UsageRecord,
    apply_payment_capture, assess, downgrade_if_expired, evaluate, record_accepted_message,
};
use bluebox_error::TierErrorKind;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn free_record(count: u64) -> UsageRecord {
    let mut usage = UsageRecord::new_free(
        Some("user@example.com".to_string()),
        today(),
        &PlansConfig::default().free,
    );
    usage.daily_message_count = count;
    usage
}

fn pro_record(expiry: DateTime<Utc>) -> UsageRecord {
    let plans = PlansConfig::default();
    let mut usage = free_record(0);
    apply_payment_capture(
        &mut usage,
        BillingCycle::Monthly,
        "pay_123",
        expiry - Duration::days(30),
        &plans,
        &BillingConfig::default(),
    );
    usage
}

#[test]
fn free_at_limit_is_denied() {
    let evaluation = evaluate(&free_record(25), today());
    assert!(!evaluation.allowed);
    assert_eq!(evaluation.effective_count, 25);
    assert!(!evaluation.reset_needed);
}

#[test]
fn free_below_limit_is_allowed() {
    let evaluation = evaluate(&free_record(24), today());
    assert!(evaluation.allowed);
    assert_eq!(evaluation.effective_count, 24);
}

#[test]
fn stale_reset_date_zeroes_effective_count() {
    let mut usage = free_record(400);
    usage.daily_token_count = 9_999_999;
    usage.last_usage_reset = NaiveDate::from_ymd_opt(2025, 5, 31).unwrap();

    let evaluation = evaluate(&usage, today());
    assert!(evaluation.reset_needed);
    assert_eq!(evaluation.effective_count, 0);
    assert_eq!(evaluation.effective_token_count, 0);
    assert!(evaluation.allowed);
    // Evaluation never mutates the record.
    assert_eq!(usage.daily_message_count, 400);
}

#[test]
fn pro_is_allowed_regardless_of_count() {
    let mut usage = pro_record(now() + Duration::days(10));
    usage.daily_message_count = 10_000;
    assert!(evaluate(&usage, today()).allowed);
}

#[test]
fn expired_pro_downgrades_before_evaluation() {
    let mut usage = pro_record(now() - Duration::hours(1));
    usage.daily_message_count = 25;

    let assessment = assess(&usage, now(), &PlansConfig::default());
    assert!(assessment.downgraded);
    assert_eq!(assessment.record.role, AccountRole::Free);
    assert_eq!(assessment.record.message_limit, UsageLimit::Limited(25));
    assert_eq!(assessment.record.model_tier, ModelTier::Basic);
    assert!(!assessment.evaluation.allowed);

    let err = assessment.require_allowed().unwrap_err();
    assert_eq!(err.kind(), &TierErrorKind::LimitReached(25));
}

#[test]
fn unexpired_pro_is_not_downgraded() {
    let mut usage = pro_record(now() + Duration::days(1));
    assert!(!downgrade_if_expired(&mut usage, now(), &PlansConfig::default()));
    assert_eq!(usage.role, AccountRole::Pro);
}

#[test]
fn pro_without_expiry_never_lapses() {
    let mut usage = pro_record(now());
    usage.subscription_expiry = None;
    assert!(!downgrade_if_expired(
        &mut usage,
        now() + Duration::days(10_000),
        &PlansConfig::default()
    ));
}

#[test]
fn free_record_is_never_downgraded() {
    let mut usage = free_record(3);
    assert!(!downgrade_if_expired(&mut usage, now(), &PlansConfig::default()));
    assert_eq!(usage, free_record(3));
}

#[test]
fn accepted_message_applies_pending_reset() {
    let mut usage = free_record(20);
    usage.daily_token_count = 5_000;
    usage.last_usage_reset = NaiveDate::from_ymd_opt(2025, 5, 30).unwrap();

    record_accepted_message(&mut usage, today(), 120);
    assert_eq!(usage.daily_message_count, 1);
    assert_eq!(usage.daily_token_count, 120);
    assert_eq!(usage.last_usage_reset, today());
}

#[test]
fn accepted_message_increments_same_day() {
    let mut usage = free_record(4);
    record_accepted_message(&mut usage, today(), 50);
    assert_eq!(usage.daily_message_count, 5);
    assert_eq!(usage.daily_token_count, 50);
}

#[test]
fn yearly_capture_grants_a_year() {
    let mut usage = free_record(25);
    apply_payment_capture(
        &mut usage,
        BillingCycle::Yearly,
        "pay_yearly",
        now(),
        &PlansConfig::default(),
        &BillingConfig::default(),
    );
    assert_eq!(usage.role, AccountRole::Pro);
    assert_eq!(usage.message_limit, UsageLimit::Unlimited);
    assert_eq!(usage.model_tier, ModelTier::Premium);
    assert_eq!(usage.subscription_expiry, Some(now() + Duration::days(365)));
    assert_eq!(usage.last_payment_id.as_deref(), Some("pay_yearly"));
    assert!(evaluate(&usage, today()).allowed);
}

#[test]
fn billing_cycle_note_defaults_to_monthly() {
    assert_eq!(BillingCycle::from_note(Some("yearly")), BillingCycle::Yearly);
    assert_eq!(BillingCycle::from_note(Some("weekly")), BillingCycle::Monthly);
    assert_eq!(BillingCycle::from_note(None), BillingCycle::Monthly);
}

#[test]
fn record_uses_stored_document_field_names() {
    let json = serde_json::to_value(free_record(2)).unwrap();
    assert_eq!(json["dailyMessageCount"], 2);
    assert_eq!(json["messageLimit"], 25);
    assert_eq!(json["lastUsageReset"], "2025-06-01");
    assert_eq!(json["role"], "free");

    let pro = serde_json::to_value(pro_record(now())).unwrap();
    assert_eq!(pro["messageLimit"], "unlimited");
}
