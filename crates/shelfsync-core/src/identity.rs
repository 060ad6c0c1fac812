//! Stable cross-run product identity.
//!
//! A [`StableProductKey`] is the UUID v5 of the store-local product id under
//! the store's namespace. It is the only join key between a fresh scrape and
//! its stored counterpart, so it must only ever be derived from
//! `(namespace, store-local id)`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::stores::{StoreCatalog, StoreProfile, UnknownStorePolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StableProductKey(Uuid);

impl StableProductKey {
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for StableProductKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Derives the stable key for `local_id` under `namespace`.
#[must_use]
pub fn stable_key(namespace: Uuid, local_id: &str) -> StableProductKey {
    StableProductKey(Uuid::new_v5(&namespace, local_id.as_bytes()))
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("unknown store '{0}'")]
    UnknownStore(String),

    #[error("store-local product id is empty")]
    EmptyLocalId,
}

/// Resolves store names to profiles and derives stable keys.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    catalog: StoreCatalog,
    policy: UnknownStorePolicy,
}

impl IdentityResolver {
    #[must_use]
    pub fn new(catalog: StoreCatalog, policy: UnknownStorePolicy) -> Self {
        Self { catalog, policy }
    }

    #[must_use]
    pub fn policy(&self) -> UnknownStorePolicy {
        self.policy
    }

    /// Returns the profile for `store_name`, or the sentinel profile when the
    /// policy tolerates unknown stores.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::UnknownStore`] under [`UnknownStorePolicy::Reject`].
    pub fn profile(&self, store_name: &str) -> Result<StoreProfile, IdentityError> {
        match self.catalog.find(store_name) {
            Some(profile) => Ok(profile.clone()),
            None => match self.policy {
                UnknownStorePolicy::Sentinel => Ok(StoreProfile::sentinel(store_name)),
                UnknownStorePolicy::Reject => {
                    Err(IdentityError::UnknownStore(store_name.to_string()))
                }
            },
        }
    }

    /// Derives the stable key for a store-local id.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] if the store is unknown under the reject
    /// policy, or the local id is blank.
    pub fn resolve(
        &self,
        store_name: &str,
        local_id: &str,
    ) -> Result<StableProductKey, IdentityError> {
        let profile = self.profile(store_name)?;
        let local_id = local_id.trim();
        if local_id.is_empty() {
            return Err(IdentityError::EmptyLocalId);
        }
        Ok(stable_key(profile.namespace, local_id))
    }
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new(StoreCatalog::builtin(), UnknownStorePolicy::default())
    }
}
