//! Normalization from [`RawScrapedProduct`] to [`shelfsync_core::CanonicalProduct`].
//!
//! Field-level parsing is delegated to [`crate::extract`]; this module
//! assembles the record and stamps its identity.

use chrono::NaiveDate;
use uuid::Uuid;

use shelfsync_core::{
    stable_key, CanonicalProduct, IdentityError, StoreProfile, DEFAULT_QUALITY_SCORE,
    DEFAULT_STATUS,
};

use crate::error::IngestError;
use crate::extract::{extract_barcode, extract_description, extract_nutrition, extract_price};
use crate::types::RawScrapedProduct;

/// Normalizes a raw record scraped on `captured_on` from the store described
/// by `profile`.
///
/// The result carries a fresh random `id`; reconciliation replaces it with
/// the stored one when the stable key has been seen before.
///
/// # Errors
///
/// Returns [`IngestError`] if the local id is blank or any price field is
/// malformed.
pub fn normalize_product(
    raw: &RawScrapedProduct,
    profile: &StoreProfile,
    captured_on: NaiveDate,
) -> Result<CanonicalProduct, IngestError> {
    let local_id = raw.local_id();
    if local_id.is_empty() {
        return Err(IdentityError::EmptyLocalId.into());
    }

    if profile.is_sentinel() {
        tracing::warn!(
            store = %raw.store,
            product_id = %local_id,
            "store not in catalog; keying product under the sentinel namespace"
        );
    }

    let price = extract_price(raw, profile, captured_on)?;
    let nutrition = extract_nutrition(raw);

    Ok(CanonicalProduct {
        id: Uuid::new_v4(),
        store_namespace: profile.namespace,
        stable_key: stable_key(profile.namespace, &local_id),
        store: raw.store.trim().to_lowercase(),
        barcode: extract_barcode(raw.barcodes.as_ref()),
        name: raw.name.trim().to_string(),
        category: raw.category_name.trim().to_string(),
        brief_description: raw
            .brief_product_description
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        status: DEFAULT_STATUS.to_string(),
        quality_score: DEFAULT_QUALITY_SCORE.to_string(),
        images: raw.image_urls.clone().unwrap_or_default(),
        description: extract_description(raw),
        nutrition,
        price,
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
