//! In-process store with the same contract as the PostgreSQL one.

use super::{Page, Store, UNIQUE_USER_MESSAGE};
use crate::error::AppError;
use crate::models::{Item, ItemCreate, ItemUpdate, User, UserCreate};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    items: BTreeMap<i64, Item>,
    users: BTreeMap<i64, User>,
    last_item_id: i64,
    last_user_id: i64,
}

/// Rows live in id-ordered maps; ids are never reused, even after deletes.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn window<T: Clone>(rows: &BTreeMap<i64, T>, page: Page) -> Vec<T> {
    let skip = usize::try_from(page.skip).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
    rows.values().skip(skip).take(limit).cloned().collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn ensure_schema(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn list_items(&self, page: Page) -> Result<Vec<Item>, AppError> {
        Ok(window(&self.tables.read().await.items, page))
    }

    async fn get_item(&self, id: i64) -> Result<Option<Item>, AppError> {
        Ok(self.tables.read().await.items.get(&id).cloned())
    }

    async fn insert_item(&self, item: &ItemCreate) -> Result<Item, AppError> {
        let mut tables = self.tables.write().await;
        tables.last_item_id += 1;
        let row = Item {
            id: tables.last_item_id,
            name: item.name.clone(),
            description: item.description.clone(),
            is_active: item.is_active,
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.items.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_item(&self, id: i64, patch: &ItemUpdate) -> Result<Option<Item>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables.items.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply_to(row);
        row.updated_at = Some(Utc::now());
        Ok(Some(row.clone()))
    }

    async fn delete_item(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.tables.write().await.items.remove(&id).is_some())
    }

    async fn list_users(&self, page: Page) -> Result<Vec<User>, AppError> {
        Ok(window(&self.tables.read().await.users, page))
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email == email || u.username == username)
            .cloned())
    }

    async fn insert_user(&self, user: &UserCreate) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.email == user.email || u.username == user.username)
        {
            return Err(AppError::Conflict(UNIQUE_USER_MESSAGE.into()));
        }
        tables.last_user_id += 1;
        let row = User {
            id: tables.last_user_id,
            email: user.email.clone(),
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            is_active: true,
            created_at: Utc::now(),
        };
        tables.users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete_user(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.tables.write().await.users.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item(name: &str) -> ItemCreate {
        ItemCreate {
            name: name.into(),
            description: None,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = MemoryStore::new();
        let a = store.insert_item(&new_item("a")).await.unwrap();
        assert!(store.delete_item(a.id).await.unwrap());
        let b = store.insert_item(&new_item("b")).await.unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn test_list_is_id_ordered_and_windowed() {
        let store = MemoryStore::new();
        for name in ["a", "b", "c"] {
            store.insert_item(&new_item(name)).await.unwrap();
        }
        let names: Vec<String> = store
            .list_items(Page { skip: 1, limit: 5 })
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["b", "c"]);
        assert!(store.list_items(Page { skip: 3, limit: 10 }).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_row() {
        let store = MemoryStore::new();
        assert!(store.update_item(5, &ItemUpdate::default()).await.unwrap().is_none());
        assert!(!store.delete_item(5).await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_user_enforces_uniqueness() {
        let store = MemoryStore::new();
        let first = UserCreate {
            email: "a@example.com".into(),
            username: "alice".into(),
            full_name: None,
        };
        let user = store.insert_user(&first).await.unwrap();
        assert!(user.is_active);

        let same_username = UserCreate {
            email: "other@example.com".into(),
            ..first.clone()
        };
        assert!(matches!(
            store.insert_user(&same_username).await,
            Err(AppError::Conflict(_))
        ));
    }
}
