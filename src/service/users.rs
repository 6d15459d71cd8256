//! User CRUD. Users are created and deleted, never updated.

use crate::error::AppError;
use crate::models::{User, UserCreate};
use crate::service::normalize_email;
use crate::store::{Page, Store, UNIQUE_USER_MESSAGE};

const NOT_FOUND: &str = "User not found";

pub struct UserService;

impl UserService {
    pub async fn list(store: &dyn Store, page: Page) -> Result<Vec<User>, AppError> {
        store.list_users(page).await
    }

    pub async fn get(store: &dyn Store, id: i64) -> Result<User, AppError> {
        store
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
    }

    /// Rejects the insert when any user already has the same email or username.
    /// The store's own unique constraint covers concurrent creates that both pass this check.
    /// Emails are compared and stored with a lowercased domain.
    pub async fn create(store: &dyn Store, user: &UserCreate) -> Result<User, AppError> {
        let user = &UserCreate {
            email: normalize_email(&user.email),
            ..user.clone()
        };
        if store
            .find_user_by_email_or_username(&user.email, &user.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(UNIQUE_USER_MESSAGE.into()));
        }
        let row = store.insert_user(user).await?;
        tracing::info!(id = row.id, username = %row.username, "user created");
        Ok(row)
    }

    pub async fn delete(store: &dyn Store, id: i64) -> Result<(), AppError> {
        if store.delete_user(id).await? {
            tracing::info!(id, "user deleted");
            Ok(())
        } else {
            Err(AppError::NotFound(NOT_FOUND.into()))
        }
    }
}
