//! Offline tests for shelfsync-db pool configuration and the in-memory store.
//! These tests do not require a live database connection.

use shelfsync_core::{
    stable_key, AppConfig, CanonicalProduct, Environment, UnknownStorePolicy, VOLI_NAMESPACE,
};
use shelfsync_db::{DbError, MemoryStore, PoolConfig, ProductStore, ScanRequest};
use uuid::Uuid;

fn app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        log_level: "info".to_string(),
        stores_path: None,
        products_table: "products".to_string(),
        unknown_store_policy: UnknownStorePolicy::Reject,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        scan_page_size: 100,
        write_batch_size: 25,
        write_max_retries: 3,
        write_backoff_base_ms: 200,
    }
}

fn product_from_json(local_id: &str) -> CanonicalProduct {
    serde_json::from_value(serde_json::json!({
        "id": Uuid::new_v4(),
        "storeNamespace": VOLI_NAMESPACE,
        "stableKey": stable_key(VOLI_NAMESPACE, local_id),
        "store": "voli",
        "name": format!("Mlijeko {local_id}"),
    }))
    .expect("minimal document deserializes")
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[tokio::test]
async fn pg_store_rejects_unsafe_table_name() {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://localhost/shelfsync")
        .expect("lazy pool does not connect");

    let err = shelfsync_db::PgProductStore::new(pool.clone(), "products; DROP TABLE x")
        .unwrap_err();
    assert!(matches!(err, DbError::InvalidTableName(_)));

    let store = shelfsync_db::PgProductStore::new(pool, "products_staging").unwrap();
    assert_eq!(store.table(), "products_staging");
}

#[tokio::test]
async fn memory_store_round_trips_minimal_documents() {
    let store = MemoryStore::new();
    let product = product_from_json("77");
    assert!(product.price.regular_price.is_empty());

    let outcome = store.batch_write(vec![product.clone()]).await.unwrap();
    assert!(outcome.is_complete());

    let keys = [product.stable_key];
    let page = store
        .scan_by_stable_keys(ScanRequest {
            keys: &keys,
            page_size: 10,
            cursor: None,
        })
        .await
        .unwrap();
    assert_eq!(page.items, vec![product]);
    assert!(page.next_cursor.is_none());
}

#[tokio::test]
async fn memory_store_is_usable_as_trait_object() {
    let store: std::sync::Arc<dyn ProductStore> = std::sync::Arc::new(MemoryStore::new());
    let page = store
        .scan_by_stable_keys(ScanRequest {
            keys: &[],
            page_size: 5,
            cursor: None,
        })
        .await
        .unwrap();
    assert!(page.items.is_empty());
}
