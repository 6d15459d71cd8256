//! Persistence for items and users.
//!
//! Handlers receive the store through [`crate::AppState`] as `Arc<dyn Store>`;
//! [`PgStore`] is the PostgreSQL implementation and [`MemoryStore`] keeps rows in process.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_tables, PgStore};

use crate::error::AppError;
use crate::models::{Item, ItemCreate, ItemUpdate, User, UserCreate};
use async_trait::async_trait;

/// Offset/limit window over a table in primary-key order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 100;
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Create tables if missing. Idempotent.
    async fn ensure_schema(&self) -> Result<(), AppError>;

    /// Round-trip to the backing store.
    async fn ping(&self) -> Result<(), AppError>;

    async fn list_items(&self, page: Page) -> Result<Vec<Item>, AppError>;
    async fn get_item(&self, id: i64) -> Result<Option<Item>, AppError>;
    async fn insert_item(&self, item: &ItemCreate) -> Result<Item, AppError>;
    /// Apply present fields and stamp `updated_at`. `None` when no row has `id`.
    async fn update_item(&self, id: i64, patch: &ItemUpdate) -> Result<Option<Item>, AppError>;
    /// Returns false when no row has `id`.
    async fn delete_item(&self, id: i64) -> Result<bool, AppError>;

    async fn list_users(&self, page: Page) -> Result<Vec<User>, AppError>;
    async fn get_user(&self, id: i64) -> Result<Option<User>, AppError>;
    /// First user whose email or username matches.
    async fn find_user_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, AppError>;
    /// Fails with `Conflict` when email or username is already taken.
    async fn insert_user(&self, user: &UserCreate) -> Result<User, AppError>;
    async fn delete_user(&self, id: i64) -> Result<bool, AppError>;
}

/// Outcome of the startup schema step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaStatus {
    Ready,
    /// Table creation failed at startup; retried on first use.
    Deferred(String),
}

impl SchemaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaStatus::Ready => "ready",
            SchemaStatus::Deferred(_) => "deferred",
        }
    }
}

/// Best-effort table creation. Never fails; a store error is logged and captured as `Deferred`.
pub async fn initialize_schema(store: &dyn Store) -> SchemaStatus {
    match store.ensure_schema().await {
        Ok(()) => {
            tracing::info!("database schema ready");
            SchemaStatus::Ready
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not create tables at startup; will retry on first use");
            SchemaStatus::Deferred(e.to_string())
        }
    }
}

pub(crate) const UNIQUE_USER_MESSAGE: &str = "Email or username already registered";
