//! Merge a fresh scrape into its stored counterpart.
//!
//! The stored record contributes only its `id`, which other systems hold on
//! to as a durable handle. Every other field, including all leaves of the
//! `price`, `nutrition` and `description` blocks, comes from the new scrape.
//! Because the blocks are typed, the historical shape is the schema itself:
//! a stored document that predates a sub-field was already defaulted on
//! load, so there is no old sub-field the new record could lack.

use crate::products::CanonicalProduct;

/// Result of reconciling one record.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciled {
    /// First sighting of the stable key; the new record is persisted as is.
    Created(CanonicalProduct),
    /// The stable key was already stored; the stored `id` was kept.
    Updated(CanonicalProduct),
}

impl Reconciled {
    #[must_use]
    pub fn product(&self) -> &CanonicalProduct {
        match self {
            Self::Created(p) | Self::Updated(p) => p,
        }
    }

    #[must_use]
    pub fn into_product(self) -> CanonicalProduct {
        match self {
            Self::Created(p) | Self::Updated(p) => p,
        }
    }

    #[must_use]
    pub fn is_update(&self) -> bool {
        matches!(self, Self::Updated(_))
    }
}

/// Produces the record to persist for `new`, given the stored record with
/// the same stable key, if any.
///
/// Callers are responsible for matching on `stable_key`; the function does
/// not compare keys itself.
#[must_use]
pub fn reconcile(old: Option<&CanonicalProduct>, new: CanonicalProduct) -> Reconciled {
    match old {
        None => Reconciled::Created(new),
        Some(old) => Reconciled::Updated(CanonicalProduct { id: old.id, ..new }),
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::identity::stable_key;
    use crate::products::{DescriptionBlock, NutritionBlock, PriceBlock};
    use crate::stores::IDEA_NAMESPACE;

    fn make_product(name: &str, regular_price: &str) -> CanonicalProduct {
        CanonicalProduct {
            id: Uuid::new_v4(),
            store_namespace: IDEA_NAMESPACE,
            stable_key: stable_key(IDEA_NAMESPACE, "880011"),
            store: "idea".to_string(),
            barcode: "8600000000017".to_string(),
            name: name.to_string(),
            category: "Pića".to_string(),
            brief_description: "0.5l".to_string(),
            status: "published".to_string(),
            quality_score: "E".to_string(),
            images: vec!["https://cdn.example/a.jpg".to_string()],
            description: DescriptionBlock {
                producer: "Old Producer".to_string(),
                ..DescriptionBlock::default()
            },
            nutrition: NutritionBlock {
                energy: "180 kJ".to_string(),
                sugar: 10.6,
                ..NutritionBlock::default()
            },
            price: PriceBlock {
                date: "01.02.2024.".to_string(),
                regular_price: regular_price.to_string(),
                ..PriceBlock::default()
            },
        }
    }

    #[test]
    fn first_sighting_passes_new_record_through() {
        let new = make_product("Cola 0.5l", "1.10");
        let result = reconcile(None, new.clone());
        assert!(!result.is_update());
        assert_eq!(result.into_product(), new);
    }

    #[test]
    fn stored_id_is_preserved() {
        let old = make_product("Cola 0.5l", "1.10");
        let new = make_product("Cola 0.5l", "1.25");
        assert_ne!(old.id, new.id);

        let result = reconcile(Some(&old), new);
        assert!(result.is_update());
        assert_eq!(result.product().id, old.id);
    }

    #[test]
    fn top_level_fields_come_from_new_record() {
        let old = make_product("Cola 0.5l", "1.10");
        let mut new = make_product("Cola Zero 0.5l", "1.10");
        new.images = vec![];
        new.barcode = String::new();
        new.status = "draft".to_string();

        let merged = reconcile(Some(&old), new.clone()).into_product();
        assert_eq!(merged.name, "Cola Zero 0.5l");
        assert!(merged.images.is_empty());
        assert_eq!(merged.barcode, "");
        assert_eq!(merged.status, "draft");
        assert_eq!(merged.stable_key, new.stable_key);
    }

    #[test]
    fn block_leaves_refresh_from_new_record() {
        let old = make_product("Cola 0.5l", "1.10");
        let mut new = make_product("Cola 0.5l", "0.99");
        new.price.discount_amount = "-10".to_string();
        new.price.discount_price = "0.99".to_string();
        new.nutrition.sugar = 0.0;
        new.description.producer = String::new();

        let merged = reconcile(Some(&old), new.clone()).into_product();
        assert_eq!(merged.price, new.price);
        assert_eq!(merged.nutrition, new.nutrition);
        assert_eq!(merged.description, new.description);
    }

    #[test]
    fn merged_record_equals_new_record_except_id() {
        let old = make_product("Cola 0.5l", "1.10");
        let new = make_product("Cola 0.5l", "1.30");
        let merged = reconcile(Some(&old), new.clone()).into_product();
        assert_eq!(merged, CanonicalProduct { id: old.id, ..new });
    }
}
