use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::middleware::{api_key_middleware, metrics_middleware};
use super::{catalog, events, handlers, search};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Routes behind the API key
    let protected = Router::new()
        .route("/config", get(handlers::get_config))
        .route("/events", post(events::submit_event))
        .route("/search", get(search::search))
        .route("/catalog", get(catalog::list_catalog))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ));

    // API routes
    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected)
        .with_state(state.clone());

    Router::new()
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
