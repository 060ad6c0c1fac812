use thiserror::Error;

use shelfsync_core::IdentityError;

/// Why a single raw record could not be normalized.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IngestError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("invalid price in `{field}`: {value:?}")]
    InvalidPrice { field: &'static str, value: String },

    #[error("invalid discount percentage: {value:?}")]
    InvalidDiscount { value: String },

    #[error("invalid discount duration {value:?}: {reason}")]
    InvalidDuration { value: String, reason: String },
}
