//! Runtime configuration from environment variables.

use crate::error::AppError;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/techstack";
pub const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:5173", "http://localhost:3000"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    /// Origins allowed to make credentialed cross-origin requests.
    pub cors_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.into(),
            host: "0.0.0.0".into(),
            port: 8000,
            max_connections: 5,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AppConfig {
    /// Read `DATABASE_URL`, `HOST`, `PORT`, `DB_MAX_CONNECTIONS` and `CORS_ORIGINS`,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();
        if let Some(url) = get("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(host) = get("HOST") {
            config.host = host;
        }
        if let Some(port) = get("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| AppError::Internal(format!("PORT must be a port number, got '{}'", port)))?;
        }
        if let Some(n) = get("DB_MAX_CONNECTIONS") {
            config.max_connections = n.trim().parse().map_err(|_| {
                AppError::Internal(format!("DB_MAX_CONNECTIONS must be a positive integer, got '{}'", n))
            })?;
        }
        if let Some(origins) = get("CORS_ORIGINS") {
            config.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        Ok(config)
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
