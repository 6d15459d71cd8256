//! Generated OpenAPI document for the item and user endpoints.

use crate::error::{ErrorBody, ErrorDetail};
use crate::handlers::{items, users};
use crate::models::{Item, ItemCreate, ItemUpdate, User, UserCreate};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "TechStack API", description = "Items and users over PostgreSQL"),
    paths(
        items::list,
        items::read,
        items::create,
        items::update,
        items::delete,
        users::list,
        users::read,
        users::create,
        users::delete,
    ),
    components(schemas(Item, ItemCreate, ItemUpdate, User, UserCreate, ErrorBody, ErrorDetail)),
    tags(
        (name = "items", description = "Item CRUD"),
        (name = "users", description = "User CRUD"),
    )
)]
pub struct ApiDoc;
