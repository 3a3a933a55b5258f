//! Event submission API.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use anihub_core::{DispatchOutcome, InboundEvent};
use tracing::error;

use super::handlers::ErrorResponse;
use crate::metrics::EVENTS_SUBMITTED;
use crate::state::AppState;

/// POST /api/v1/events
///
/// Hand an inbound event to the event loop and return what it produced.
pub async fn submit_event(
    State(state): State<Arc<AppState>>,
    Json(event): Json<InboundEvent>,
) -> Result<Json<DispatchOutcome>, (StatusCode, Json<ErrorResponse>)> {
    let kind = event.kind();
    match state.events().submit(event).await {
        Ok(outcome) => {
            EVENTS_SUBMITTED.with_label_values(&[kind, "handled"]).inc();
            Ok(Json(outcome))
        }
        Err(e) => {
            EVENTS_SUBMITTED
                .with_label_values(&[kind, "loop_closed"])
                .inc();
            error!(kind, "Failed to submit event: {}", e);
            Err(ErrorResponse::with_status(StatusCode::SERVICE_UNAVAILABLE, e))
        }
    }
}
