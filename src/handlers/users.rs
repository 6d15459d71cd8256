//! User handlers: list, read, create, delete.

use crate::error::{AppError, ErrorBody};
use crate::extractors::{IdPath, JsonBody, Pagination};
use crate::models::{User, UserCreate};
use crate::service::{RequestValidator, UserService};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

#[utoipa::path(
    get,
    path = "/users",
    operation_id = "list_users",
    tag = "users",
    params(
        ("skip" = Option<i64>, Query, description = "Rows to skip, default 0"),
        ("limit" = Option<i64>, Query, description = "Maximum rows, default 100"),
    ),
    responses(
        (status = 200, description = "Users in id order", body = Vec<User>),
        (status = 422, description = "Invalid skip or limit", body = ErrorBody),
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Pagination(page): Pagination,
) -> Result<Json<Vec<User>>, AppError> {
    let rows = UserService::list(state.store(), page).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    operation_id = "read_user",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = User),
        (status = 404, description = "User not found", body = ErrorBody),
    )
)]
pub async fn read(State(state): State<AppState>, IdPath(id): IdPath) -> Result<Json<User>, AppError> {
    let row = UserService::get(state.store(), id).await?;
    Ok(Json(row))
}

#[utoipa::path(
    post,
    path = "/users",
    operation_id = "create_user",
    tag = "users",
    request_body = UserCreate,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Email or username already registered", body = ErrorBody),
        (status = 422, description = "Invalid payload", body = ErrorBody),
    )
)]
pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let input: UserCreate = RequestValidator::parse(body, UserCreate::RULES)?;
    let row = UserService::create(state.store(), &input).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    operation_id = "delete_user",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = ErrorBody),
    )
)]
pub async fn delete(State(state): State<AppState>, IdPath(id): IdPath) -> Result<StatusCode, AppError> {
    UserService::delete(state.store(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
