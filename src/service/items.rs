//! Item CRUD.

use crate::error::AppError;
use crate::models::{Item, ItemCreate, ItemUpdate};
use crate::store::{Page, Store};

const NOT_FOUND: &str = "Item not found";

pub struct ItemService;

impl ItemService {
    pub async fn list(store: &dyn Store, page: Page) -> Result<Vec<Item>, AppError> {
        store.list_items(page).await
    }

    pub async fn get(store: &dyn Store, id: i64) -> Result<Item, AppError> {
        store
            .get_item(id)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
    }

    pub async fn create(store: &dyn Store, item: &ItemCreate) -> Result<Item, AppError> {
        let row = store.insert_item(item).await?;
        tracing::debug!(id = row.id, "item created");
        Ok(row)
    }

    /// Apply only the fields present in `patch`. An empty patch returns the row untouched.
    pub async fn update(store: &dyn Store, id: i64, patch: &ItemUpdate) -> Result<Item, AppError> {
        if patch.is_empty() {
            return Self::get(store, id).await;
        }
        store
            .update_item(id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
    }

    pub async fn delete(store: &dyn Store, id: i64) -> Result<(), AppError> {
        if store.delete_item(id).await? {
            tracing::debug!(id, "item deleted");
            Ok(())
        } else {
            Err(AppError::NotFound(NOT_FOUND.into()))
        }
    }
}
