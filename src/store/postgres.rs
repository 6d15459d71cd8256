//! PostgreSQL-backed store: table DDL and row-level queries.

use super::{Page, Store, UNIQUE_USER_MESSAGE};
use crate::error::AppError;
use crate::models::{Item, ItemCreate, ItemUpdate, User, UserCreate};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::OnceCell;

const ITEM_COLUMNS: &str = "id, name, description, is_active, created_at, updated_at";
const USER_COLUMNS: &str = "id, email, username, full_name, is_active, created_at";

const ITEMS_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS items (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ
    )
"#;

const USERS_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        username TEXT NOT NULL UNIQUE,
        full_name TEXT,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

/// Create `items` and `users` if they do not exist.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(ITEMS_DDL).execute(pool).await?;
    sqlx::query(USERS_DDL).execute(pool).await?;
    Ok(())
}

fn unique_to_conflict(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(UNIQUE_USER_MESSAGE.into())
        }
        _ => AppError::Db(e),
    }
}

pub struct PgStore {
    pool: PgPool,
    schema: OnceCell<()>,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            schema: OnceCell::new(),
        }
    }

    /// Build a pool that opens connections on first use, so an unreachable
    /// database does not stop the process from starting.
    pub fn connect_lazy(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let options = PgConnectOptions::from_str(database_url)?;
        Ok(Self::connect_lazy_with(options, max_connections))
    }

    pub fn connect_lazy_with(options: PgConnectOptions, max_connections: u32) -> Self {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect_lazy_with(options);
        Self::new(pool)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Pool, once tables are known to exist. Retries table creation until it succeeds.
    async fn ready(&self) -> Result<&PgPool, AppError> {
        self.schema
            .get_or_try_init(|| ensure_tables(&self.pool))
            .await?;
        Ok(&self.pool)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ensure_schema(&self) -> Result<(), AppError> {
        self.ready().await.map(|_| ())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }

    async fn list_items(&self, page: Page) -> Result<Vec<Item>, AppError> {
        let pool = self.ready().await?;
        let sql = format!(
            "SELECT {} FROM items ORDER BY id ASC OFFSET $1 LIMIT $2",
            ITEM_COLUMNS
        );
        let rows = sqlx::query_as::<_, Item>(&sql)
            .bind(page.skip)
            .bind(page.limit)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    async fn get_item(&self, id: i64) -> Result<Option<Item>, AppError> {
        let pool = self.ready().await?;
        let sql = format!("SELECT {} FROM items WHERE id = $1", ITEM_COLUMNS);
        let row = sqlx::query_as::<_, Item>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    async fn insert_item(&self, item: &ItemCreate) -> Result<Item, AppError> {
        let pool = self.ready().await?;
        let sql = format!(
            "INSERT INTO items (name, description, is_active) VALUES ($1, $2, $3) RETURNING {}",
            ITEM_COLUMNS
        );
        let row = sqlx::query_as::<_, Item>(&sql)
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.is_active)
            .fetch_one(pool)
            .await?;
        Ok(row)
    }

    async fn update_item(&self, id: i64, patch: &ItemUpdate) -> Result<Option<Item>, AppError> {
        let pool = self.ready().await?;
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE items SET updated_at = NOW()");
        if let Some(name) = &patch.name {
            qb.push(", name = ").push_bind(name.clone());
        }
        if let Some(description) = &patch.description {
            qb.push(", description = ").push_bind(description.clone());
        }
        if let Some(is_active) = patch.is_active {
            qb.push(", is_active = ").push_bind(is_active);
        }
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(ITEM_COLUMNS);
        let row = qb.build_query_as::<Item>().fetch_optional(pool).await?;
        Ok(row)
    }

    async fn delete_item(&self, id: i64) -> Result<bool, AppError> {
        let pool = self.ready().await?;
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_users(&self, page: Page) -> Result<Vec<User>, AppError> {
        let pool = self.ready().await?;
        let sql = format!(
            "SELECT {} FROM users ORDER BY id ASC OFFSET $1 LIMIT $2",
            USER_COLUMNS
        );
        let rows = sqlx::query_as::<_, User>(&sql)
            .bind(page.skip)
            .bind(page.limit)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, AppError> {
        let pool = self.ready().await?;
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    async fn find_user_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<User>, AppError> {
        let pool = self.ready().await?;
        let sql = format!(
            "SELECT {} FROM users WHERE email = $1 OR username = $2 ORDER BY id ASC LIMIT 1",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .bind(username)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    async fn insert_user(&self, user: &UserCreate) -> Result<User, AppError> {
        let pool = self.ready().await?;
        let sql = format!(
            "INSERT INTO users (email, username, full_name, is_active) VALUES ($1, $2, $3, TRUE) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.email)
            .bind(&user.username)
            .bind(&user.full_name)
            .fetch_one(pool)
            .await
            .map_err(unique_to_conflict)
    }

    async fn delete_user(&self, id: i64) -> Result<bool, AppError> {
        let pool = self.ready().await?;
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}


/// Runs against a live server. Each test creates its own database from `DATABASE_URL`
/// and drops it afterwards; without `DATABASE_URL` (or a reachable server) they return early.
#[cfg(test)]
mod pg_tests {
    use super::*;
    use crate::store::{initialize_schema, SchemaStatus};
    use chrono::Utc;

    struct Server {
        admin: PgPool,
        options: PgConnectOptions,
    }

    impl Server {
        async fn connect() -> Option<Self> {
            let url = std::env::var("DATABASE_URL").ok()?;
            let options = PgConnectOptions::from_str(&url).ok()?;
            let admin = PgPoolOptions::new()
                .max_connections(1)
                .acquire_timeout(Duration::from_secs(5))
                .connect_with(options.clone())
                .await
                .ok()?;
            Some(Self { admin, options })
        }

        fn database_name(tag: &str) -> String {
            format!(
                "techstack_test_{}_{}_{}",
                tag,
                std::process::id(),
                Utc::now().timestamp_nanos_opt().unwrap_or_default()
            )
        }

        async fn create_database(&self, name: &str) {
            sqlx::query(&format!("CREATE DATABASE \"{}\"", name))
                .execute(&self.admin)
                .await
                .unwrap();
        }

        fn store_for(&self, name: &str) -> PgStore {
            PgStore::connect_lazy_with(self.options.clone().database(name), 2)
        }

        /// Fresh database with tables in place.
        async fn fresh_store(&self, tag: &str) -> (PgStore, String) {
            let name = Self::database_name(tag);
            self.create_database(&name).await;
            let store = self.store_for(&name);
            assert_eq!(initialize_schema(&store).await, SchemaStatus::Ready);
            (store, name)
        }

        async fn drop_database(&self, store: PgStore, name: &str) {
            store.pool().close().await;
            let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)", name))
                .execute(&self.admin)
                .await;
        }
    }

    fn item(name: &str, description: Option<&str>, is_active: bool) -> ItemCreate {
        ItemCreate {
            name: name.into(),
            description: description.map(String::from),
            is_active,
        }
    }

    #[tokio::test]
    async fn test_pagination_and_round_trip() {
        let Some(server) = Server::connect().await else {
            return;
        };
        let (store, name) = server.fresh_store("page").await;

        let created = store.insert_item(&item("A", None, false)).await.unwrap();
        store.insert_item(&item("B", None, true)).await.unwrap();
        store.insert_item(&item("C", None, true)).await.unwrap();
        assert!(created.id > 0);

        let fetched = store.get_item(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "A");
        assert_eq!(fetched.description, None);
        assert!(!fetched.is_active);
        assert!(fetched.updated_at.is_none());
        assert_eq!(fetched.created_at, created.created_at);

        let first = store.list_items(Page { skip: 0, limit: 1 }).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, created.id);
        assert!(store.list_items(Page { skip: 3, limit: 10 }).await.unwrap().is_empty());

        server.drop_database(store, &name).await;
    }

    #[tokio::test]
    async fn test_partial_update_stamps_and_clears() {
        let Some(server) = Server::connect().await else {
            return;
        };
        let (store, name) = server.fresh_store("update").await;

        let created = store.insert_item(&item("Lamp", Some("old"), false)).await.unwrap();
        let patch = ItemUpdate {
            description: Some(Some("new".into())),
            ..Default::default()
        };
        let updated = store.update_item(created.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.name, "Lamp");
        assert!(!updated.is_active);
        assert_eq!(updated.description.as_deref(), Some("new"));
        assert!(updated.updated_at.is_some());

        let clear = ItemUpdate {
            description: Some(None),
            ..Default::default()
        };
        let cleared = store.update_item(created.id, &clear).await.unwrap().unwrap();
        assert_eq!(cleared.description, None);
        assert_eq!(cleared.name, "Lamp");

        assert!(store.update_item(created.id + 1000, &patch).await.unwrap().is_none());
        assert!(store.delete_item(created.id).await.unwrap());
        assert!(!store.delete_item(created.id).await.unwrap());

        server.drop_database(store, &name).await;
    }

    #[tokio::test]
    async fn test_unique_violation_maps_to_conflict() {
        let Some(server) = Server::connect().await else {
            return;
        };
        let (store, name) = server.fresh_store("unique").await;

        let first = UserCreate {
            email: "a@example.com".into(),
            username: "alice".into(),
            full_name: None,
        };
        let user = store.insert_user(&first).await.unwrap();
        assert!(user.is_active);

        let same_email = UserCreate {
            username: "alicia".into(),
            ..first.clone()
        };
        let err = store.insert_user(&same_email).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == UNIQUE_USER_MESSAGE));
        assert_eq!(store.list_users(Page::default()).await.unwrap().len(), 1);

        server.drop_database(store, &name).await;
    }

    #[tokio::test]
    async fn test_deferred_schema_created_on_first_use() {
        let Some(server) = Server::connect().await else {
            return;
        };
        let name = Server::database_name("deferred");
        let store = server.store_for(&name);

        let status = initialize_schema(&store).await;
        assert!(matches!(status, SchemaStatus::Deferred(_)), "got {:?}", status);

        server.create_database(&name).await;
        assert!(store.list_items(Page::default()).await.unwrap().is_empty());
        assert!(store.get_user(1).await.unwrap().is_none());

        server.drop_database(store, &name).await;
    }
}
