//! The storage seam the batch orchestrator is written against.
//!
//! Two operations are enough: a paginated scan over the `stable_key` index
//! and a non-atomic batch put that reports which items it could not write.

use async_trait::async_trait;

use shelfsync_core::{CanonicalProduct, StableProductKey};

use crate::DbError;

/// One page request of a scan by stable key.
#[derive(Debug, Clone, Copy)]
pub struct ScanRequest<'a> {
    pub keys: &'a [StableProductKey],
    pub page_size: usize,
    /// Continuation token from the previous page; `None` starts from the beginning.
    pub cursor: Option<&'a str>,
}

#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    pub items: Vec<CanonicalProduct>,
    /// Present while more pages may follow.
    pub next_cursor: Option<String>,
}

/// A put the store accepted the request for but did not apply.
#[derive(Debug, Clone, PartialEq)]
pub struct UnprocessedItem {
    pub product: CanonicalProduct,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct BatchWriteOutcome {
    pub unprocessed: Vec<UnprocessedItem>,
}

impl BatchWriteOutcome {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unprocessed.is_empty()
    }
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Returns one page of stored products whose `stable_key` is in `request.keys`.
    async fn scan_by_stable_keys(&self, request: ScanRequest<'_>) -> Result<ScanPage, DbError>;

    /// Puts every item, keyed by `id`, overwriting existing documents.
    ///
    /// Items that could not be written are returned in the outcome; an `Err`
    /// means the call itself failed and nothing can be assumed written.
    async fn batch_write(&self, items: Vec<CanonicalProduct>)
        -> Result<BatchWriteOutcome, DbError>;
}
