//! HTTP routes.

mod chat;
mod context;
mod payments;
mod usage;

pub use context::NewsResponse;
pub use usage::UsageStatus;

use crate::AppState;
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/chat", post(chat::chat))
        .route("/api/usage/:user_id", get(usage::usage_status))
        .route("/api/usage/:user_id/messages", post(usage::record_message))
        .route("/api/payments/webhook", post(payments::webhook))
        .route("/api/web", get(context::web))
        .route("/api/news", get(context::news))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe.
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
