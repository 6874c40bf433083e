use crate::{ApiError, AppState, SIGNATURE_HEADER, WebhookEvent};
use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use bluebox_error::{PaymentError, PaymentErrorKind};
use bluebox_tier::{BillingCycle, UsageRecord, apply_payment_capture};
use chrono::Utc;
use serde_json::{Value, json};
use tracing::{debug, info, instrument, warn};

/// `POST /api/payments/webhook`: verify, then upgrade on captured payments.
#[instrument(skip_all)]
pub(crate) async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let Some(verifier) = state.webhooks.as_ref() else {
        return Err(PaymentError::new(PaymentErrorKind::NotConfigured).into());
    };
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    verifier.verify(signature, &body)?;

    let event = WebhookEvent::from_slice(&body)?;
    match event.event.as_str() {
        "payment.captured" => {
            let payment = event.payment()?;
            let Some(user_id) = payment.notes.user_id.clone() else {
                warn!(payment_id = %payment.id, "Captured payment has no userId note");
                return Ok(Json(json!({ "status": "ok" })));
            };
            let cycle = BillingCycle::from_note(payment.notes.billing_cycle.as_deref());
            let now = Utc::now();

            let mut usage = state.store.get(&user_id).await?.unwrap_or_else(|| {
                UsageRecord::new_free(
                    payment.notes.email.clone(),
                    now.date_naive(),
                    &state.tier.plans.free,
                )
            });
            if usage.email.is_none() {
                usage.email = payment.notes.email.clone();
            }
            apply_payment_capture(
                &mut usage,
                cycle,
                &payment.id,
                now,
                &state.tier.plans,
                &state.tier.billing,
            );
            state.store.put(&user_id, usage).await?;
            info!(%user_id, payment_id = %payment.id, amount = ?payment.amount, "Payment captured");
        }
        "payment.failed" => {
            let payment = event.payment()?;
            info!(
                payment_id = %payment.id,
                reason = payment.error_description.as_deref().unwrap_or("unknown"),
                "Payment failed"
            );
        }
        other => debug!(event = other, "Ignoring webhook event"),
    }

    Ok(Json(json!({ "status": "ok" })))
}
