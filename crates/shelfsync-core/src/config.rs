use crate::app_config::{AppConfig, Environment};
use crate::stores::UnknownStorePolicy;
use crate::ConfigError;

/// Largest write chunk accepted; matches the per-request item cap of batch-put
/// document stores.
pub const MAX_WRITE_BATCH_SIZE: usize = 25;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("SHELFSYNC_ENV", "development"))?;
    let log_level = or_default("SHELFSYNC_LOG_LEVEL", "info");
    let stores_path = lookup("SHELFSYNC_STORES_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let products_table = or_default("SHELFSYNC_PRODUCTS_TABLE", "products");
    if !is_sql_identifier(&products_table) {
        return Err(invalid(
            "SHELFSYNC_PRODUCTS_TABLE",
            format!("'{products_table}' is not a plain SQL identifier"),
        ));
    }

    let unknown_store_policy = or_default("SHELFSYNC_UNKNOWN_STORE", "reject")
        .parse::<UnknownStorePolicy>()
        .map_err(|reason| invalid("SHELFSYNC_UNKNOWN_STORE", reason))?;

    let db_max_connections = parse_u32("SHELFSYNC_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("SHELFSYNC_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("SHELFSYNC_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let scan_page_size = parse_usize("SHELFSYNC_SCAN_PAGE_SIZE", "100")?;
    if scan_page_size == 0 {
        return Err(invalid("SHELFSYNC_SCAN_PAGE_SIZE", "must be at least 1".into()));
    }

    let write_batch_size = parse_usize("SHELFSYNC_WRITE_BATCH_SIZE", "25")?;
    if write_batch_size == 0 || write_batch_size > MAX_WRITE_BATCH_SIZE {
        return Err(invalid(
            "SHELFSYNC_WRITE_BATCH_SIZE",
            format!("must be between 1 and {MAX_WRITE_BATCH_SIZE}"),
        ));
    }

    let write_max_retries = parse_u32("SHELFSYNC_WRITE_MAX_RETRIES", "3")?;
    let write_backoff_base_ms = parse_u64("SHELFSYNC_WRITE_BACKOFF_BASE_MS", "200")?;

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        stores_path,
        products_table,
        unknown_store_policy,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        scan_page_size,
        write_batch_size,
        write_max_retries,
        write_backoff_base_ms,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SHELFSYNC_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// Returns `true` for `[A-Za-z_][A-Za-z0-9_]*`, which is safe to splice into SQL.
#[must_use]
pub fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
