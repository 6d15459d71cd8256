//! JSON body extraction. Only the media type and JSON syntax are checked here;
//! the shape of the document belongs to the validator.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
};
use serde_json::Value;

/// Raw JSON body. A non-JSON `Content-Type`, a malformed document or an empty body
/// are all validation errors on field `body`.
#[derive(Clone, Debug)]
pub struct JsonBody(pub Value);

/// `application/json` or any `application/*+json`, parameters ignored.
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    match essence.split_once('/') {
        Some(("application", sub)) => sub == "json" || sub.ends_with("+json"),
        _ => false,
    }
}

fn content_type_error() -> Response {
    AppError::invalid("body", "content_type", "Content-Type must be application/json").into_response()
}

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let declared = req.headers().contains_key(header::CONTENT_TYPE);
        let is_json = is_json_content_type(req.headers());
        if declared && !is_json {
            return Err(content_type_error());
        }
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(AppError::invalid("body", "missing", "body is required").into_response());
        }
        // A document sent with no Content-Type at all.
        if !is_json {
            return Err(content_type_error());
        }
        serde_json::from_slice(&bytes).map(JsonBody).map_err(|e| {
            AppError::invalid("body", "json", format!("body is not valid JSON: {}", e)).into_response()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{HeaderValue, StatusCode};
    use serde_json::json;

    fn headers(content_type: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(header::CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        map
    }

    async fn extract(content_type: Option<&str>, body: &str) -> Result<JsonBody, Response> {
        let mut req = axum::http::Request::builder().method("POST").uri("/items");
        if let Some(ct) = content_type {
            req = req.header(header::CONTENT_TYPE, ct);
        }
        JsonBody::from_request(req.body(Body::from(body.to_string())).unwrap(), &()).await
    }

    async fn rejection_detail(resp: Response) -> (StatusCode, Value) {
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        (status, body["error"]["details"][0].clone())
    }

    #[test]
    fn test_json_media_types() {
        assert!(is_json_content_type(&headers("application/json")));
        assert!(is_json_content_type(&headers("application/json; charset=utf-8")));
        assert!(is_json_content_type(&headers("Application/JSON")));
        assert!(is_json_content_type(&headers("application/merge-patch+json")));
        assert!(!is_json_content_type(&headers("text/plain")));
        assert!(!is_json_content_type(&headers("text/json")));
        assert!(!is_json_content_type(&headers("application/x-www-form-urlencoded")));
        assert!(!is_json_content_type(&HeaderMap::new()));
    }

    #[tokio::test]
    async fn test_json_body_accepted() {
        let JsonBody(v) = extract(Some("application/json"), r#"{"name":"A"}"#).await.unwrap();
        assert_eq!(v, json!({ "name": "A" }));
    }

    #[tokio::test]
    async fn test_text_plain_rejected_even_when_valid_json() {
        let resp = extract(Some("text/plain"), r#"{"name":"A"}"#).await.unwrap_err();
        let (status, detail) = rejection_detail(resp).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(detail["field"], "body");
        assert_eq!(detail["kind"], "content_type");
    }

    #[tokio::test]
    async fn test_undeclared_media_type() {
        let (_, detail) = rejection_detail(extract(None, r#"{"name":"A"}"#).await.unwrap_err()).await;
        assert_eq!(detail["kind"], "content_type");

        let (_, detail) = rejection_detail(extract(None, "").await.unwrap_err()).await;
        assert_eq!(detail["kind"], "missing");
    }

    #[tokio::test]
    async fn test_malformed_json_rejected() {
        let resp = extract(Some("application/json"), "{not json").await.unwrap_err();
        let (_, detail) = rejection_detail(resp).await;
        assert_eq!(detail["field"], "body");
        assert_eq!(detail["kind"], "json");
    }
}
