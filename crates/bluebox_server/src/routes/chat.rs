use crate::{ApiError, AppState};
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{StatusCode, header},
    response::Response,
};
use futures_util::StreamExt;
use std::convert::Infallible;

/// `POST /api/chat`: stream the assistant reply as plain text.
pub(crate) async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let fragments = state.relay.relay(&body).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(fragments.map(Ok::<_, Infallible>)))
        .map_err(|e| ApiError::Internal(e.to_string()))
}
