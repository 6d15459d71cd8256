use crate::service::{FieldKind, FieldRule};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stored item as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload accepted by `POST /items`.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct ItemCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "super::default_true")]
    #[schema(default = true)]
    pub is_active: bool,
}

impl ItemCreate {
    pub const RULES: &'static [FieldRule] = &[
        FieldRule::required("name", FieldKind::String),
        FieldRule::optional("description", FieldKind::String).nullable(),
        FieldRule::optional("is_active", FieldKind::Bool),
    ];
}

/// Payload accepted by `PUT /items/{id}`. Absent fields are left untouched;
/// `description: null` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct ItemUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::present")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl ItemUpdate {
    pub const RULES: &'static [FieldRule] = &[
        FieldRule::optional("name", FieldKind::String),
        FieldRule::optional("description", FieldKind::String).nullable(),
        FieldRule::optional("is_active", FieldKind::Bool),
    ];

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.is_active.is_none()
    }

    /// Apply the present fields to `item`. Returns whether anything was set.
    pub fn apply_to(&self, item: &mut Item) -> bool {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(is_active) = self.is_active {
            item.is_active = is_active;
        }
        !self.is_empty()
    }
}
