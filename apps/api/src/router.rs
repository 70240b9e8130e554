use std::sync::Arc;

use axum::{routing::get, Router};

use account_cell::router::account_routes;
use scheduling_cell::router::scheduling_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    // Route paths mirror the original site layout, so the cells are merged
    // at the root rather than nested under prefixes.
    Router::new()
        .route("/", get(|| async { "MedTrack API is running!" }))
        .merge(account_routes(state.clone()))
        .merge(scheduling_routes(state))
}
