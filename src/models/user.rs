use crate::service::{FieldKind, FieldRule};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload accepted by `POST /users`. New users are always active.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct UserCreate {
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl UserCreate {
    pub const RULES: &'static [FieldRule] = &[
        FieldRule::required("email", FieldKind::Email),
        FieldRule::required("username", FieldKind::String),
        FieldRule::optional("full_name", FieldKind::String).nullable(),
    ];
}
