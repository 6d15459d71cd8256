//! Liveness, readiness, and API description.

use crate::openapi::ApiDoc;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::OpenApi;

#[derive(Serialize)]
pub struct RootBody {
    message: &'static str,
    status: &'static str,
    docs: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
pub struct HealthBody {
    status: &'static str,
}

#[derive(Serialize)]
pub struct ReadyBody {
    status: &'static str,
    schema: &'static str,
    database: &'static str,
}

pub async fn root() -> Json<RootBody> {
    Json(RootBody {
        message: "Welcome to TechStack API",
        status: "healthy",
        docs: "/openapi.json",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "healthy" })
}

/// 503 when the store cannot be reached; reports whether startup table creation was deferred.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyBody>) {
    let schema = state.schema.as_str();
    match state.store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadyBody {
                status: "ready",
                schema,
                database: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyBody {
                    status: "degraded",
                    schema,
                    database: "unavailable",
                }),
            )
        }
    }
}

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
