//! Per-store descriptors: identity namespace and price-text format.
//!
//! Every retail chain gets a fixed namespace UUID that salts stable-key
//! derivation, plus the small amount of format knowledge needed to read its
//! price and discount strings.

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ConfigError;

pub const VOLI_NAMESPACE: Uuid = Uuid::from_u128(0xdb03_ea1b_1f65_4882_85ed_5b73_310b_089a);
pub const IDEA_NAMESPACE: Uuid = Uuid::from_u128(0x8b6e_ca61_ced0_48a7_b73b_1676_8e2b_8c76);

/// Namespace assigned to unrecognised stores under [`UnknownStorePolicy::Sentinel`].
pub const SENTINEL_NAMESPACE: Uuid = Uuid::nil();

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreProfile {
    /// Lower-case store name as it appears in scraped records.
    pub name: String,
    pub namespace: Uuid,
    /// Symbol trailing every price string, e.g. `"€"` in `"3.50€"` or `"3,50 €"`.
    pub currency_symbol: String,
    /// Discount windows are scraped as `DD.MM-DD.MM` and need the capture
    /// year appended.
    #[serde(default)]
    pub discount_dates_omit_year: bool,
}

impl StoreProfile {
    /// Profile used for records whose store is not in the catalog.
    #[must_use]
    pub fn sentinel(name: &str) -> Self {
        Self {
            name: name.to_lowercase(),
            namespace: SENTINEL_NAMESPACE,
            currency_symbol: "€".to_string(),
            discount_dates_omit_year: false,
        }
    }

    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.namespace == SENTINEL_NAMESPACE
    }
}

/// What to do with a record whose store name has no catalog entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownStorePolicy {
    /// Reject the record; the rest of the batch continues.
    #[default]
    Reject,
    /// Key the record under [`SENTINEL_NAMESPACE`].
    Sentinel,
}

impl FromStr for UnknownStorePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "sentinel" => Ok(Self::Sentinel),
            other => Err(format!(
                "unknown store policy '{other}'; expected 'reject' or 'sentinel'"
            )),
        }
    }
}

impl std::fmt::Display for UnknownStorePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Sentinel => write!(f, "sentinel"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreCatalog {
    pub stores: Vec<StoreProfile>,
}

impl StoreCatalog {
    /// The two chains the scrapers currently cover.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            stores: vec![
                StoreProfile {
                    name: "voli".to_string(),
                    namespace: VOLI_NAMESPACE,
                    currency_symbol: "€".to_string(),
                    discount_dates_omit_year: true,
                },
                StoreProfile {
                    name: "idea".to_string(),
                    namespace: IDEA_NAMESPACE,
                    currency_symbol: "€".to_string(),
                    discount_dates_omit_year: false,
                },
            ],
        }
    }

    /// Case-insensitive lookup by store name.
    #[must_use]
    pub fn find(&self, store_name: &str) -> Option<&StoreProfile> {
        let wanted = store_name.trim().to_lowercase();
        self.stores.iter().find(|s| s.name == wanted)
    }
}

impl Default for StoreCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Load and validate a store catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_store_catalog(path: &Path) -> Result<StoreCatalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::StoresFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut catalog: StoreCatalog = serde_yaml::from_str(&content)?;
    for store in &mut catalog.stores {
        store.name = store.name.trim().to_lowercase();
    }

    validate_catalog(&catalog)?;

    Ok(catalog)
}

fn validate_catalog(catalog: &StoreCatalog) -> Result<(), ConfigError> {
    if catalog.stores.is_empty() {
        return Err(ConfigError::Validation(
            "catalog must list at least one store".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();
    let mut seen_namespaces = HashSet::new();

    for store in &catalog.stores {
        if store.name.is_empty() {
            return Err(ConfigError::Validation(
                "store name must be non-empty".to_string(),
            ));
        }

        if store.namespace == SENTINEL_NAMESPACE {
            return Err(ConfigError::Validation(format!(
                "store '{}' uses the sentinel namespace",
                store.name
            )));
        }

        if store.currency_symbol.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "store '{}' has an empty currency symbol",
                store.name
            )));
        }

        if !seen_names.insert(store.name.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate store name: '{}'",
                store.name
            )));
        }

        if !seen_namespaces.insert(store.namespace) {
            return Err(ConfigError::Validation(format!(
                "duplicate namespace {} (store '{}')",
                store.namespace, store.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "stores_test.rs"]
mod tests;
