//! Postgres-backed [`ProductStore`] over a JSONB document table.
//!
//! Each row holds one [`CanonicalProduct`] document keyed by its `id`, with
//! `stable_key` lifted into an indexed column for the reconciliation scan.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use shelfsync_core::config::is_sql_identifier;
use shelfsync_core::CanonicalProduct;

use crate::store::{BatchWriteOutcome, ProductStore, ScanPage, ScanRequest, UnprocessedItem};
use crate::DbError;

#[derive(Debug, Clone)]
pub struct PgProductStore {
    pool: PgPool,
    table: String,
}

impl PgProductStore {
    /// Wraps `pool`, reading and writing documents in `table`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidTableName`] unless `table` is a plain SQL
    /// identifier; the name is spliced into statements.
    pub fn new(pool: PgPool, table: &str) -> Result<Self, DbError> {
        if !is_sql_identifier(table) {
            return Err(DbError::InvalidTableName(table.to_string()));
        }
        Ok(Self {
            pool,
            table: table.to_string(),
        })
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Number of documents in the table.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the query fails.
    pub async fn count(&self) -> Result<i64, DbError> {
        let count =
            sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", self.table))
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    /// Keyset-paginated on `id`; the cursor is the last `id` of the previous page.
    async fn scan_by_stable_keys(&self, request: ScanRequest<'_>) -> Result<ScanPage, DbError> {
        if request.keys.is_empty() {
            return Ok(ScanPage::default());
        }

        let after = request
            .cursor
            .map(|c| Uuid::parse_str(c).map_err(|_| DbError::InvalidCursor(c.to_string())))
            .transpose()?;
        let keys: Vec<Uuid> = request.keys.iter().map(|k| k.as_uuid()).collect();
        let limit = i64::try_from(request.page_size.max(1)).unwrap_or(i64::MAX);

        let rows = sqlx::query_as::<_, (Uuid, Json<CanonicalProduct>)>(&format!(
            "SELECT id, document \
             FROM {} \
             WHERE stable_key = ANY($1) \
               AND ($2::uuid IS NULL OR id > $2) \
             ORDER BY id \
             LIMIT $3",
            self.table
        ))
        .bind(&keys)
        .bind(after)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let full_page = rows.len() == request.page_size.max(1);
        let next_cursor = if full_page {
            rows.last().map(|(id, _)| id.to_string())
        } else {
            None
        };

        Ok(ScanPage {
            items: rows.into_iter().map(|(_, Json(doc))| doc).collect(),
            next_cursor,
        })
    }

    /// Upserts each document on `id`. Statements are independent; a database
    /// error on one item marks it unprocessed and the rest continue.
    async fn batch_write(
        &self,
        items: Vec<CanonicalProduct>,
    ) -> Result<BatchWriteOutcome, DbError> {
        let statement = format!(
            "INSERT INTO {} (id, stable_key, store, document, updated_at) \
             VALUES ($1, $2, $3, $4, NOW()) \
             ON CONFLICT (id) DO UPDATE SET \
                 stable_key = EXCLUDED.stable_key, \
                 store      = EXCLUDED.store, \
                 document   = EXCLUDED.document, \
                 updated_at = NOW()",
            self.table
        );

        let mut outcome = BatchWriteOutcome::default();
        for product in items {
            let result = sqlx::query(&statement)
                .bind(product.id)
                .bind(product.stable_key.as_uuid())
                .bind(&product.store)
                .bind(Json(&product))
                .execute(&self.pool)
                .await;

            match result {
                Ok(_) => {}
                Err(sqlx::Error::Database(err)) => {
                    tracing::warn!(
                        id = %product.id,
                        stable_key = %product.stable_key,
                        error = %err,
                        "product put rejected by database"
                    );
                    outcome.unprocessed.push(UnprocessedItem {
                        product,
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(outcome)
    }
}
