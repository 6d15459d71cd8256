//! Path id and `skip`/`limit` query extraction.

use crate::error::{AppError, FieldError, ValidationErrors};
use crate::store::Page;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};
use std::collections::HashMap;

/// Integer primary key from the last path segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdPath(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::invalid("id", "path", e.body_text()))?;
        parse_id(&raw).map(IdPath)
    }
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::invalid("id", "type", "id must be an integer"))
}

/// `?skip=&limit=` with defaults 0 and 100. Negative or non-integer values are rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination(pub Page);

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::invalid("query", "query", e.body_text()))?;
        page_from_params(&params).map(Pagination)
    }
}

fn page_from_params(params: &HashMap<String, String>) -> Result<Page, AppError> {
    let mut errors = ValidationErrors::default();
    let mut page = Page::default();
    for (name, slot) in [("skip", &mut page.skip), ("limit", &mut page.limit)] {
        let Some(raw) = params.get(name) else {
            continue;
        };
        match raw.trim().parse::<i64>() {
            Ok(n) if n >= 0 => *slot = n,
            Ok(_) => errors.push(FieldError::new(
                name,
                "range",
                format!("{} must be greater than or equal to 0", name),
            )),
            Err(_) => errors.push(FieldError::new(
                name,
                "type",
                format!("{} must be an integer", name),
            )),
        }
    }
    if errors.is_empty() {
        Ok(page)
    } else {
        Err(AppError::Validation(errors))
    }
}
