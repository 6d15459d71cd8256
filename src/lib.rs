//! TechStack API: item and user CRUD over PostgreSQL.

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use app::build_app;
pub use config::AppConfig;
pub use error::{AppError, FieldError, ValidationErrors};
pub use state::AppState;
pub use store::{initialize_schema, MemoryStore, PgStore, SchemaStatus, Store};
