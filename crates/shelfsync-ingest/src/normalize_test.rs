use serde_json::json;

use shelfsync_core::{IdentityResolver, StoreCatalog, VOLI_NAMESPACE};

use super::*;

fn voli() -> StoreProfile {
    StoreCatalog::builtin().find("voli").cloned().unwrap()
}

fn captured_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
}

fn make_raw() -> RawScrapedProduct {
    serde_json::from_value(json!({
        "store": "Voli",
        "product_id": 10234,
        "name": "  Hljeb bijeli 500g ",
        "category_name": "Pekara",
        "price_info": { "current_price": "0.89€" },
        "image_urls": ["https://cdn.example/hljeb.jpg"]
    }))
    .unwrap()
}

#[test]
fn normalize_product_sets_identity_fields() {
    let product = normalize_product(&make_raw(), &voli(), captured_on()).unwrap();
    assert_eq!(product.store_namespace, VOLI_NAMESPACE);
    assert_eq!(product.stable_key, stable_key(VOLI_NAMESPACE, "10234"));
    assert_eq!(product.store, "voli");
    assert_eq!(product.id.get_version_num(), 4);
}

#[test]
fn normalize_product_key_matches_resolver() {
    let resolver = IdentityResolver::default();
    let product = normalize_product(&make_raw(), &voli(), captured_on()).unwrap();
    assert_eq!(
        product.stable_key,
        resolver.resolve("Voli", "10234").unwrap()
    );
}

#[test]
fn normalize_product_assigns_fresh_id_each_time() {
    let raw = make_raw();
    let first = normalize_product(&raw, &voli(), captured_on()).unwrap();
    let second = normalize_product(&raw, &voli(), captured_on()).unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(first.stable_key, second.stable_key);
}

#[test]
fn normalize_product_applies_defaults() {
    let product = normalize_product(&make_raw(), &voli(), captured_on()).unwrap();
    assert_eq!(product.name, "Hljeb bijeli 500g");
    assert_eq!(product.category, "Pekara");
    assert_eq!(product.brief_description, "");
    assert_eq!(product.status, "published");
    assert_eq!(product.quality_score, "E");
    assert_eq!(product.barcode, "");
    assert_eq!(product.images, vec!["https://cdn.example/hljeb.jpg"]);
    assert_eq!(product.price.regular_price, "0.89");
    assert_eq!(product.price.date, "05.03.2024.");
}

#[test]
fn normalize_product_defaults_missing_images_to_empty() {
    let mut raw = make_raw();
    raw.image_urls = None;
    let product = normalize_product(&raw, &voli(), captured_on()).unwrap();
    assert!(product.images.is_empty());
}

#[test]
fn normalize_product_rejects_blank_local_id() {
    let mut raw = make_raw();
    raw.product_id = crate::types::ScalarValue::Text("  ".to_string());
    let err = normalize_product(&raw, &voli(), captured_on()).unwrap_err();
    assert_eq!(err, IngestError::Identity(IdentityError::EmptyLocalId));
}

#[test]
fn normalize_product_propagates_price_errors() {
    let mut raw = make_raw();
    raw.price_info = None;
    let err = normalize_product(&raw, &voli(), captured_on()).unwrap_err();
    assert_eq!(err, IngestError::MissingField { field: "price_info" });
}

#[test]
fn normalize_product_under_sentinel_profile() {
    let mut raw = make_raw();
    raw.store = "Lidl".to_string();
    let profile = StoreProfile::sentinel(&raw.store);
    let product = normalize_product(&raw, &profile, captured_on()).unwrap();
    assert_eq!(product.store, "lidl");
    assert!(product.store_namespace.is_nil());
}
