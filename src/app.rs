//! Application composition: resource routers, cross-origin policy, body limit, request tracing.

use crate::routes::{common_routes, item_routes, user_routes};
use crate::state::AppState;
use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Credentialed CORS for a fixed origin list. Methods and headers are mirrored from the
/// preflight, since a wildcard is not allowed together with credentials.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

pub fn build_app(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(item_routes(state.clone()))
        .merge(user_routes(state))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}


#[cfg(test)]
mod tests {
    use super::testing::{send, test_app};
    use super::*;
    use crate::store::{MemoryStore, SchemaStatus};
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_liveness_endpoints() {
        let app = test_app();
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "healthy" }));

        let (status, body) = send(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_ready_reports_deferred_schema() {
        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            SchemaStatus::Deferred("connection refused".into()),
        );
        let app = build_app(state, &[]);
        let (status, body) = send(&app, Method::GET, "/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["schema"], "deferred");
        assert_eq!(body["database"], "ok");
    }

    #[tokio::test]
    async fn test_openapi_served() {
        let (status, body) = send(&test_app(), Method::GET, "/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/items/{id}"].is_object());
    }

    #[tokio::test]
    async fn test_cors_allows_listed_origin_with_credentials() {
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/items")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-custom")
            .body(Body::empty())
            .unwrap();
        let resp = test_app().oneshot(req).await.unwrap();
        let headers = resp.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://localhost:5173");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "DELETE");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "x-custom");
    }

    #[tokio::test]
    async fn test_cors_ignores_unlisted_origin() {
        let req = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, "https://evil.example")
            .body(Body::empty())
            .unwrap();
        let resp = test_app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let big = "x".repeat(MAX_BODY_BYTES + 1);
        let (status, _) = send(&test_app(), Method::POST, "/items", Some(json!({ "name": big }))).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }
}
