//! Catalog API handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use anihub_core::catalog::{sort_entries, CatalogEntry};
use serde::Serialize;

use super::handlers::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CatalogListResponse {
    pub entries: Vec<CatalogEntry>,
    pub total: usize,
}

/// GET /api/v1/catalog
///
/// The whole catalog, sorted by title.
pub async fn list_catalog(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CatalogListResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.catalog().entries() {
        Ok(mut entries) => {
            sort_entries(&mut entries);
            let total = entries.len();
            Ok(Json(CatalogListResponse { entries, total }))
        }
        Err(e) => Err(ErrorResponse::with_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            e,
        )),
    }
}
