//! Server binary: reads config from env, prepares tables (best effort), serves the API.

use std::sync::Arc;
use techstack_api::{build_app, initialize_schema, AppConfig, AppState, PgStore};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("techstack_api=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let store = Arc::new(PgStore::connect_lazy(&config.database_url, config.max_connections)?);
    let schema = initialize_schema(store.as_ref()).await;
    let state = AppState::new(store, schema);
    let app = build_app(state, &config.cors_origins);

    let listener = TcpListener::bind(config.socket_addr()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
