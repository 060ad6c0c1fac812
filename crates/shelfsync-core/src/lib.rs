//! Domain types shared across the shelfsync workspace.
//!
//! Holds the persisted [`CanonicalProduct`] shape, the stable-identity scheme
//! used to join fresh scrapes against stored records, the reconciler, and
//! configuration loading.

pub mod app_config;
pub mod config;
pub mod identity;
pub mod products;
pub mod reconcile;
pub mod stores;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, MAX_WRITE_BATCH_SIZE};
pub use identity::{stable_key, IdentityError, IdentityResolver, StableProductKey};
pub use products::{
    CanonicalProduct, DescriptionBlock, NutritionBlock, PriceBlock, DEFAULT_QUALITY_SCORE,
    DEFAULT_STATUS,
};
pub use reconcile::{reconcile, Reconciled};
pub use stores::{
    load_store_catalog, StoreCatalog, StoreProfile, UnknownStorePolicy, IDEA_NAMESPACE,
    SENTINEL_NAMESPACE, VOLI_NAMESPACE,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read stores file {path}: {source}")]
    StoresFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse stores file: {0}")]
    StoresFileParse(#[from] serde_yaml::Error),

    #[error("store catalog validation failed: {0}")]
    Validation(String),
}
