use serde::{Deserialize, Serialize};

/// PostgreSQL configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub max_pool_size: usize,
    pub migrations_dir: String,
    pub goose_binary_path: String,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: "transferlog".to_string(),
            username: "transferlog".to_string(),
            password: "transferlog".to_string(),
            max_pool_size: 10,
            migrations_dir: "crates/transferlog-postgres/migrations".to_string(),
            goose_binary_path: "goose".to_string(),
        }
    }
}

impl PostgresConfig {
    /// Load configuration from TRANSFERLOG_POSTGRES_* environment
    /// variables, falling back to defaults for anything unset
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("TRANSFERLOG_POSTGRES_HOST").unwrap_or(defaults.host),
            port: std::env::var("TRANSFERLOG_POSTGRES_PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(defaults.port),
            database: std::env::var("TRANSFERLOG_POSTGRES_DB").unwrap_or(defaults.database),
            username: std::env::var("TRANSFERLOG_POSTGRES_USER").unwrap_or(defaults.username),
            password: std::env::var("TRANSFERLOG_POSTGRES_PASSWORD").unwrap_or(defaults.password),
            max_pool_size: std::env::var("TRANSFERLOG_POSTGRES_POOL_SIZE")
                .ok()
                .and_then(|size| size.parse().ok())
                .unwrap_or(defaults.max_pool_size),
            migrations_dir: std::env::var("TRANSFERLOG_MIGRATIONS_DIR")
                .unwrap_or(defaults.migrations_dir),
            goose_binary_path: std::env::var("TRANSFERLOG_GOOSE_BINARY")
                .unwrap_or(defaults.goose_binary_path),
        }
    }
}
