use std::path::PathBuf;

use crate::stores::UnknownStorePolicy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-level settings, built once at startup and passed down explicitly.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    /// Optional YAML store catalog; the built-in Voli/Idea catalog is used when unset.
    pub stores_path: Option<PathBuf>,
    pub products_table: String,
    pub unknown_store_policy: UnknownStorePolicy,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub scan_page_size: usize,
    pub write_batch_size: usize,
    pub write_max_retries: u32,
    pub write_backoff_base_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("stores_path", &self.stores_path)
            .field("database_url", &"[redacted]")
            .field("products_table", &self.products_table)
            .field("unknown_store_policy", &self.unknown_store_policy)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("scan_page_size", &self.scan_page_size)
            .field("write_batch_size", &self.write_batch_size)
            .field("write_max_retries", &self.write_max_retries)
            .field("write_backoff_base_ms", &self.write_backoff_base_ms)
            .finish()
    }
}
