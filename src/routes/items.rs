use crate::handlers::items::{create, delete, list, read, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn item_routes(state: AppState) -> Router {
    Router::new()
        .route("/items", get(list).post(create))
        .route("/items/", get(list).post(create))
        .route("/items/:id", get(read).put(update).delete(delete))
        .with_state(state)
}
