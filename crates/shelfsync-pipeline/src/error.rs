use thiserror::Error;

use shelfsync_core::{IdentityError, StableProductKey};
use shelfsync_db::DbError;
use shelfsync_ingest::IngestError;

/// Invocation-level failure. Nothing about the batch's write state can be
/// assumed when one of these is returned.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("product store error: {0}")]
    Store(#[from] DbError),

    #[error("scan cursor did not advance past {cursor:?}")]
    StalledCursor { cursor: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordFailure {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("stable key {stable_key} already appeared earlier in this batch")]
    DuplicateInBatch { stable_key: StableProductKey },
}

/// A raw record that was dropped from the batch; the rest of the batch
/// carries on without it.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{store}/{local_id}: {failure}")]
pub struct RecordError {
    pub store: String,
    pub local_id: String,
    pub failure: RecordFailure,
}

impl RecordError {
    pub(crate) fn new(store: &str, local_id: &str, failure: impl Into<RecordFailure>) -> Self {
        Self {
            store: store.to_string(),
            local_id: local_id.to_string(),
            failure: failure.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_error_names_store_and_local_id() {
        let err = RecordError::new(
            "Konzum",
            "42",
            IdentityError::UnknownStore("Konzum".to_string()),
        );
        assert_eq!(err.to_string(), "Konzum/42: unknown store 'Konzum'");
    }

    #[test]
    fn ingest_failure_keeps_field_name() {
        let err = RecordError::new(
            "voli",
            "7",
            IngestError::MissingField {
                field: "price_info",
            },
        );
        assert_eq!(err.to_string(), "voli/7: missing required field `price_info`");
    }
}
