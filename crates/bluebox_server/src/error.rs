//! HTTP error responses.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use bluebox_error::{
    BlueboxError, BlueboxErrorKind, ContextError, ContextErrorKind, PaymentError, RelayError,
    TierError, TierErrorKind,
};
use serde_json::json;
use tracing::error;

/// Failure of a request handler.
#[derive(Debug, derive_more::Display, derive_more::From)]
pub enum ApiError {
    /// Chat relay failure, reported as plain text
    #[display("{}", _0)]
    Relay(RelayError),
    /// Usage limit or plan failure
    #[display("{}", _0)]
    Tier(TierError),
    /// Webhook verification or decoding failure
    #[display("{}", _0)]
    Payment(PaymentError),
    /// Context lookup failure
    #[display("{}", _0)]
    Context(ContextError),
    /// Anything else
    #[from(skip)]
    #[display("Internal error: {}", _0)]
    Internal(String),
}

impl From<BlueboxError> for ApiError {
    fn from(err: BlueboxError) -> Self {
        match err.kind() {
            BlueboxErrorKind::Relay(e) => ApiError::Relay(e.clone()),
            BlueboxErrorKind::Tier(e) => ApiError::Tier(e.clone()),
            BlueboxErrorKind::Payment(e) => ApiError::Payment(e.clone()),
            BlueboxErrorKind::Context(e) => ApiError::Context(e.clone()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Relay(e) => {
                let code = status(e.kind().status_code());
                if code.is_server_error() {
                    error!(error = %e, "Chat request failed");
                }
                (
                    code,
                    [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                    e.kind().to_string(),
                )
                    .into_response()
            }
            ApiError::Tier(e) => {
                let code = match e.kind() {
                    TierErrorKind::LimitReached(_) => StatusCode::TOO_MANY_REQUESTS,
                    TierErrorKind::UnknownPlan(_) => StatusCode::BAD_REQUEST,
                    TierErrorKind::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (code, Json(json!({ "error": e.kind().to_string() }))).into_response()
            }
            ApiError::Payment(e) => {
                let code = status(e.kind().status_code());
                if code.is_server_error() {
                    error!(error = %e, "Webhook rejected");
                }
                (code, Json(json!({ "error": e.kind().to_string() }))).into_response()
            }
            ApiError::Context(e) => match e.kind() {
                ContextErrorKind::MissingQuery | ContextErrorKind::BlockedHost(_) => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": e.kind().to_string() })),
                )
                    .into_response(),
                ContextErrorKind::Fetch(details) | ContextErrorKind::Parse(details) => {
                    error!(error = %e, "Context lookup failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({ "error": "Could not access the web", "details": details })),
                    )
                        .into_response()
                }
            },
            ApiError::Internal(message) => {
                error!(%message, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": message })),
                )
                    .into_response()
            }
        }
    }
}
