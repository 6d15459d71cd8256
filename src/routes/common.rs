//! Common routes: root, health, readiness, OpenAPI document.

use crate::handlers::health::{health, openapi, ready, root};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/openapi.json", get(openapi))
        .with_state(state)
}
