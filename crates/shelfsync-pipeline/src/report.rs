use shelfsync_core::Reconciled;
use shelfsync_db::UnprocessedItem;

use crate::error::RecordError;

/// The reconciled batch, before anything is written.
#[derive(Debug, Default)]
pub struct BatchPlan {
    /// Raw records received.
    pub attempted: usize,
    /// Stored records the scan returned for the batch's stable keys.
    pub existing: usize,
    pub records: Vec<Reconciled>,
    pub rejected: Vec<RecordError>,
}

impl BatchPlan {
    #[must_use]
    pub fn created(&self) -> usize {
        self.records.iter().filter(|r| !r.is_update()).count()
    }

    #[must_use]
    pub fn updated(&self) -> usize {
        self.records.iter().filter(|r| r.is_update()).count()
    }
}

/// Outcome of one [`crate::UpsertPipeline::upsert_batch`] call.
#[derive(Debug, Default)]
pub struct UpsertReport {
    pub attempted: usize,
    /// Records with no stored counterpart.
    pub created: usize,
    /// Records that replaced a stored counterpart, keeping its `id`.
    pub updated: usize,
    /// Records the store confirmed.
    pub written: usize,
    pub rejected: Vec<RecordError>,
    /// Dead-letter records, still unprocessed after the retry budget.
    pub unprocessed: Vec<UnprocessedItem>,
}

impl UpsertReport {
    #[must_use]
    pub fn unprocessed_count(&self) -> usize {
        self.unprocessed.len()
    }

    /// `true` when every raw record ended up written.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.unprocessed.is_empty()
    }
}
