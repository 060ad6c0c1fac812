//! In-process [`ProductStore`] used for dry runs and tests.
//!
//! Behaves like the document store the pipeline targets: documents keyed by
//! `id`, a paginated scan over `stable_key`, and batch puts that can come back
//! partially unprocessed. Throttling and outages can be injected.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use shelfsync_core::{CanonicalProduct, StableProductKey};

use crate::store::{BatchWriteOutcome, ProductStore, ScanPage, ScanRequest, UnprocessedItem};
use crate::DbError;

#[derive(Debug, Default)]
struct State {
    documents: BTreeMap<Uuid, CanonicalProduct>,
    /// Item puts still to be bounced back as unprocessed.
    throttled_puts: usize,
    failing_scans: usize,
    scan_calls: usize,
    write_calls: usize,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    max_batch_size: Option<usize>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects `batch_write` calls carrying more than `max` items.
    #[must_use]
    pub fn with_max_batch_size(mut self, max: usize) -> Self {
        self.max_batch_size = Some(max);
        self
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `product` directly, bypassing batch semantics.
    pub fn insert(&self, product: CanonicalProduct) {
        self.lock().documents.insert(product.id, product);
    }

    /// The next `count` item puts come back unprocessed.
    pub fn throttle_next_puts(&self, count: usize) {
        self.lock().throttled_puts = count;
    }

    /// The next `count` scan calls fail outright.
    pub fn fail_next_scans(&self, count: usize) {
        self.lock().failing_scans = count;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<CanonicalProduct> {
        self.lock().documents.get(&id).cloned()
    }

    /// All stored documents with `key`, in `id` order.
    #[must_use]
    pub fn find_by_stable_key(&self, key: StableProductKey) -> Vec<CanonicalProduct> {
        self.lock()
            .documents
            .values()
            .filter(|p| p.stable_key == key)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn scan_calls(&self) -> usize {
        self.lock().scan_calls
    }

    #[must_use]
    pub fn write_calls(&self) -> usize {
        self.lock().write_calls
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn scan_by_stable_keys(&self, request: ScanRequest<'_>) -> Result<ScanPage, DbError> {
        let mut state = self.lock();
        state.scan_calls += 1;
        if state.failing_scans > 0 {
            state.failing_scans -= 1;
            return Err(DbError::Unavailable("injected scan failure".to_string()));
        }

        let after = request
            .cursor
            .map(|c| Uuid::parse_str(c).map_err(|_| DbError::InvalidCursor(c.to_string())))
            .transpose()?;
        let wanted: HashSet<StableProductKey> = request.keys.iter().copied().collect();
        let page_size = request.page_size.max(1);

        let items: Vec<CanonicalProduct> = state
            .documents
            .values()
            .filter(|p| after.is_none_or(|a| p.id > a))
            .filter(|p| wanted.contains(&p.stable_key))
            .take(page_size)
            .cloned()
            .collect();

        let next_cursor = if items.len() == page_size {
            items.last().map(|p| p.id.to_string())
        } else {
            None
        };

        Ok(ScanPage { items, next_cursor })
    }

    async fn batch_write(
        &self,
        items: Vec<CanonicalProduct>,
    ) -> Result<BatchWriteOutcome, DbError> {
        if let Some(max) = self.max_batch_size {
            if items.len() > max {
                return Err(DbError::BatchTooLarge {
                    size: items.len(),
                    max,
                });
            }
        }

        let mut state = self.lock();
        state.write_calls += 1;

        let mut outcome = BatchWriteOutcome::default();
        for product in items {
            if state.throttled_puts > 0 {
                state.throttled_puts -= 1;
                outcome.unprocessed.push(UnprocessedItem {
                    product,
                    reason: "throughput exceeded".to_string(),
                });
                continue;
            }
            state.documents.insert(product.id, product);
        }

        Ok(outcome)
    }
}
