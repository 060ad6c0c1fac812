//! The batch upsert orchestrator.
//!
//! One call processes one homogeneous batch, typically a single category of a
//! single store:
//!
//! 1. resolve every record's stable key,
//! 2. fetch stored records for those keys, page by page,
//! 3. normalize each record and reconcile it against its stored counterpart,
//! 4. write the results in chunks, re-submitting unprocessed items.
//!
//! Bad records are dropped into the report and the batch carries on; a
//! failing scan or write call aborts the invocation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;

use shelfsync_core::{
    reconcile, CanonicalProduct, IdentityResolver, StableProductKey, StoreProfile,
};
use shelfsync_db::{ProductStore, ScanRequest};
use shelfsync_ingest::{normalize_product, RawScrapedProduct};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, RecordError, RecordFailure};
use crate::report::{BatchPlan, UpsertReport};
use crate::retry::write_with_retry;

/// A raw record whose identity has been established.
struct Resolved<'a> {
    raw: &'a RawScrapedProduct,
    local_id: String,
    profile: StoreProfile,
    key: StableProductKey,
}

#[derive(Clone)]
pub struct UpsertPipeline {
    resolver: IdentityResolver,
    config: PipelineConfig,
    store: Arc<dyn ProductStore>,
}

impl std::fmt::Debug for UpsertPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpsertPipeline")
            .field("resolver", &self.resolver)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl UpsertPipeline {
    #[must_use]
    pub fn new(
        resolver: IdentityResolver,
        config: PipelineConfig,
        store: Arc<dyn ProductStore>,
    ) -> Self {
        Self {
            resolver,
            config: config.clamped(),
            store,
        }
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[must_use]
    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }

    /// Upserts a batch scraped today.
    ///
    /// # Errors
    ///
    /// See [`Self::upsert_batch_on`].
    pub async fn upsert_batch(
        &self,
        raw: &[RawScrapedProduct],
    ) -> Result<UpsertReport, PipelineError> {
        self.upsert_batch_on(raw, chrono::Local::now().date_naive())
            .await
    }

    /// Upserts a batch scraped on `captured_on`.
    ///
    /// Per-record failures land in [`UpsertReport::rejected`]; items the
    /// store would not take after the retry budget land in
    /// [`UpsertReport::unprocessed`].
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if a scan or write call fails, or the scan
    /// cursor stops advancing. Chunks written before the failure stay written.
    pub async fn upsert_batch_on(
        &self,
        raw: &[RawScrapedProduct],
        captured_on: NaiveDate,
    ) -> Result<UpsertReport, PipelineError> {
        let plan = self.plan_batch_on(raw, captured_on).await?;

        let mut report = UpsertReport {
            attempted: plan.attempted,
            created: plan.created(),
            updated: plan.updated(),
            rejected: plan.rejected,
            ..UpsertReport::default()
        };

        let products: Vec<CanonicalProduct> = plan
            .records
            .into_iter()
            .map(shelfsync_core::Reconciled::into_product)
            .collect();
        let total = products.len();

        for chunk in products.chunks(self.config.write_batch_size) {
            let dead_letter = write_with_retry(
                self.store.as_ref(),
                chunk.to_vec(),
                self.config.write_max_retries,
                self.config.write_backoff_base_ms,
            )
            .await?;
            report.unprocessed.extend(dead_letter);
        }
        report.written = total - report.unprocessed.len();

        tracing::info!(
            attempted = report.attempted,
            created = report.created,
            updated = report.updated,
            written = report.written,
            rejected = report.rejected.len(),
            unprocessed = report.unprocessed_count(),
            "batch upsert finished"
        );

        Ok(report)
    }

    /// Resolves, fetches and reconciles without writing. Used for dry runs.
    ///
    /// # Errors
    ///
    /// See [`Self::plan_batch_on`].
    pub async fn plan_batch(&self, raw: &[RawScrapedProduct]) -> Result<BatchPlan, PipelineError> {
        self.plan_batch_on(raw, chrono::Local::now().date_naive())
            .await
    }

    /// # Errors
    ///
    /// Returns [`PipelineError`] if the scan fails or its cursor stops
    /// advancing.
    pub async fn plan_batch_on(
        &self,
        raw: &[RawScrapedProduct],
        captured_on: NaiveDate,
    ) -> Result<BatchPlan, PipelineError> {
        let mut plan = BatchPlan {
            attempted: raw.len(),
            ..BatchPlan::default()
        };

        let mut resolved = Vec::with_capacity(raw.len());
        for record in raw {
            let local_id = record.local_id();
            match self.resolve(record, &local_id) {
                Ok((profile, key)) => resolved.push(Resolved {
                    raw: record,
                    local_id,
                    profile,
                    key,
                }),
                Err(failure) => {
                    tracing::warn!(
                        store = %record.store,
                        product_id = %local_id,
                        error = %failure,
                        "rejecting record"
                    );
                    plan.rejected
                        .push(RecordError::new(&record.store, &local_id, failure));
                }
            }
        }

        let keys: Vec<StableProductKey> = {
            let mut seen = HashSet::new();
            resolved
                .iter()
                .map(|r| r.key)
                .filter(|k| seen.insert(*k))
                .collect()
        };
        let existing = self.fetch_existing(&keys).await?;
        plan.existing = existing.len();

        let category = raw
            .iter()
            .map(|r| r.category_name.trim())
            .find(|c| !c.is_empty())
            .unwrap_or("");
        tracing::info!(
            category,
            records = raw.len(),
            existing = plan.existing,
            "processing batch"
        );

        // Keys of records already accepted; the first valid record wins.
        let mut in_batch = HashSet::with_capacity(resolved.len());
        for entry in resolved {
            if in_batch.contains(&entry.key) {
                tracing::warn!(
                    store = %entry.raw.store,
                    product_id = %entry.local_id,
                    stable_key = %entry.key,
                    "duplicate product in batch; keeping the first"
                );
                plan.rejected.push(RecordError::new(
                    &entry.raw.store,
                    &entry.local_id,
                    RecordFailure::DuplicateInBatch {
                        stable_key: entry.key,
                    },
                ));
                continue;
            }

            match normalize_product(entry.raw, &entry.profile, captured_on) {
                Ok(product) => {
                    in_batch.insert(entry.key);
                    let reconciled = reconcile(existing.get(&entry.key), product);
                    tracing::debug!(
                        stable_key = %entry.key,
                        id = %reconciled.product().id,
                        update = reconciled.is_update(),
                        "record reconciled"
                    );
                    plan.records.push(reconciled);
                }
                Err(err) => {
                    tracing::warn!(
                        store = %entry.raw.store,
                        product_id = %entry.local_id,
                        error = %err,
                        "rejecting record"
                    );
                    plan.rejected
                        .push(RecordError::new(&entry.raw.store, &entry.local_id, err));
                }
            }
        }

        Ok(plan)
    }

    fn resolve(
        &self,
        record: &RawScrapedProduct,
        local_id: &str,
    ) -> Result<(StoreProfile, StableProductKey), RecordFailure> {
        let profile = self.resolver.profile(&record.store)?;
        let key = self.resolver.resolve(&record.store, local_id)?;
        Ok((profile, key))
    }

    /// Follows scan cursors until the store reports no more pages.
    ///
    /// When several stored records share a key the first one returned wins.
    async fn fetch_existing(
        &self,
        keys: &[StableProductKey],
    ) -> Result<HashMap<StableProductKey, CanonicalProduct>, PipelineError> {
        let mut existing = HashMap::with_capacity(keys.len());
        if keys.is_empty() {
            return Ok(existing);
        }

        let mut cursor: Option<String> = None;
        loop {
            let page = self
                .store
                .scan_by_stable_keys(ScanRequest {
                    keys,
                    page_size: self.config.scan_page_size,
                    cursor: cursor.as_deref(),
                })
                .await?;

            for product in page.items {
                existing.entry(product.stable_key).or_insert(product);
            }

            match page.next_cursor {
                None => return Ok(existing),
                Some(next) if cursor.as_deref() == Some(next.as_str()) => {
                    return Err(PipelineError::StalledCursor { cursor: next });
                }
                Some(next) => cursor = Some(next),
            }
        }
    }
}
