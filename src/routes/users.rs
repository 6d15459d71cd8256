use crate::handlers::users::{create, delete, list, read};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn user_routes(state: AppState) -> Router {
    Router::new()
        .route("/users", get(list).post(create))
        .route("/users/", get(list).post(create))
        .route("/users/:id", get(read).delete(delete))
        .with_state(state)
}
