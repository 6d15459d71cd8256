//! Item handlers: list, read, create, update, delete.

use crate::error::{AppError, ErrorBody};
use crate::extractors::{IdPath, JsonBody, Pagination};
use crate::models::{Item, ItemCreate, ItemUpdate};
use crate::service::{ItemService, RequestValidator};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

#[utoipa::path(
    get,
    path = "/items",
    operation_id = "list_items",
    tag = "items",
    params(
        ("skip" = Option<i64>, Query, description = "Rows to skip, default 0"),
        ("limit" = Option<i64>, Query, description = "Maximum rows, default 100"),
    ),
    responses(
        (status = 200, description = "Items in id order", body = Vec<Item>),
        (status = 422, description = "Invalid skip or limit", body = ErrorBody),
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Pagination(page): Pagination,
) -> Result<Json<Vec<Item>>, AppError> {
    let rows = ItemService::list(state.store(), page).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/items/{id}",
    operation_id = "read_item",
    tag = "items",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "The item", body = Item),
        (status = 404, description = "Item not found", body = ErrorBody),
    )
)]
pub async fn read(State(state): State<AppState>, IdPath(id): IdPath) -> Result<Json<Item>, AppError> {
    let row = ItemService::get(state.store(), id).await?;
    Ok(Json(row))
}

#[utoipa::path(
    post,
    path = "/items",
    operation_id = "create_item",
    tag = "items",
    request_body = ItemCreate,
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 422, description = "Invalid payload", body = ErrorBody),
    )
)]
pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let input: ItemCreate = RequestValidator::parse(body, ItemCreate::RULES)?;
    let row = ItemService::create(state.store(), &input).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[utoipa::path(
    put,
    path = "/items/{id}",
    operation_id = "update_item",
    tag = "items",
    params(("id" = i64, Path, description = "Item id")),
    request_body = ItemUpdate,
    responses(
        (status = 200, description = "Item updated", body = Item),
        (status = 404, description = "Item not found", body = ErrorBody),
        (status = 422, description = "Invalid payload", body = ErrorBody),
    )
)]
pub async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(body): JsonBody,
) -> Result<Json<Item>, AppError> {
    let patch: ItemUpdate = RequestValidator::parse(body, ItemUpdate::RULES)?;
    let row = ItemService::update(state.store(), id, &patch).await?;
    Ok(Json(row))
}

#[utoipa::path(
    delete,
    path = "/items/{id}",
    operation_id = "delete_item",
    tag = "items",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 404, description = "Item not found", body = ErrorBody),
    )
)]
pub async fn delete(State(state): State<AppState>, IdPath(id): IdPath) -> Result<StatusCode, AppError> {
    ItemService::delete(state.store(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
