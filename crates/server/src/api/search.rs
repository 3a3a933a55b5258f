//! Search API.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use anihub_core::{events::SearchRequest, DispatchOutcome, InboundEvent, SearchResult};
use serde::{Deserialize, Serialize};

use super::handlers::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total: usize,
}

/// GET /api/v1/search?query=
///
/// Runs an inline search on behalf of the operator.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request = SearchRequest {
        sender_id: state.config().operator.id,
        query: params.query,
    };

    match state.events().submit(InboundEvent::SearchRequest(request)).await {
        Ok(DispatchOutcome::SearchResults { results }) => {
            let total = results.len();
            Ok(Json(SearchResponse { results, total }))
        }
        Ok(other) => Err(ErrorResponse::with_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("unexpected outcome: {:?}", other),
        )),
        Err(e) => Err(ErrorResponse::with_status(StatusCode::SERVICE_UNAVAILABLE, e)),
    }
}
