use crate::{ApiError, AppState};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bluebox_context::{Headline, WebContext};
use serde::{Deserialize, Serialize};
use tracing::error;

#[derive(Debug, Deserialize)]
pub(crate) struct WebQuery {
    q: Option<String>,
}

/// `GET /api/web?q=`: scrape a URL or summarize a search.
pub(crate) async fn web(
    State(state): State<AppState>,
    Query(query): Query<WebQuery>,
) -> Result<Json<WebContext>, ApiError> {
    let q = query.q.unwrap_or_default();
    Ok(Json(state.web.lookup(&q).await?))
}

/// Body of `GET /api/news`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsResponse {
    /// Headlines in section order
    pub headlines: Vec<Headline>,
    /// Failure description; absent on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `GET /api/news`: current headlines, or 500 with an empty list.
pub(crate) async fn news(State(state): State<AppState>) -> Response {
    match state.web.headlines().await {
        Ok(headlines) => Json(NewsResponse {
            headlines,
            error: None,
        })
        .into_response(),
        Err(e) => {
            error!(error = %e, "Headline fetch failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(NewsResponse {
                    headlines: Vec::new(),
                    error: Some("Could not fetch news".to_string()),
                }),
            )
                .into_response()
        }
    }
}
