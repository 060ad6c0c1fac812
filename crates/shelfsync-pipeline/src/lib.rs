//! Batch upsert of scraped products into the product store.
//!
//! [`UpsertPipeline`] takes one homogeneous batch of raw records, joins each
//! against its stored counterpart by stable key, reconciles, and writes the
//! result back in bounded chunks.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub(crate) mod retry;

pub use config::PipelineConfig;
pub use error::{PipelineError, RecordError, RecordFailure};
pub use pipeline::UpsertPipeline;
pub use report::{BatchPlan, UpsertReport};
