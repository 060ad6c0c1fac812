use std::io::Write;

use super::*;

fn write_yaml(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    file.write_all(contents.as_bytes()).expect("write yaml");
    file
}

#[test]
fn namespaces_match_published_constants() {
    assert_eq!(
        VOLI_NAMESPACE.to_string(),
        "db03ea1b-1f65-4882-85ed-5b73310b089a"
    );
    assert_eq!(
        IDEA_NAMESPACE.to_string(),
        "8b6eca61-ced0-48a7-b73b-16768e2b8c76"
    );
}

#[test]
fn find_is_case_insensitive() {
    let catalog = StoreCatalog::builtin();
    let voli = catalog.find("Voli").expect("voli present");
    assert_eq!(voli.namespace, VOLI_NAMESPACE);
    assert!(voli.discount_dates_omit_year);
    assert_eq!(catalog.find("  IDEA ").map(|s| s.namespace), Some(IDEA_NAMESPACE));
}

#[test]
fn find_unknown_store_is_none() {
    assert!(StoreCatalog::builtin().find("lidl").is_none());
}

#[test]
fn sentinel_profile_uses_nil_namespace() {
    let profile = StoreProfile::sentinel("Lidl");
    assert!(profile.is_sentinel());
    assert_eq!(profile.name, "lidl");
    assert!(!profile.discount_dates_omit_year);
}

#[test]
fn unknown_store_policy_parses() {
    assert_eq!(
        "Reject".parse::<UnknownStorePolicy>(),
        Ok(UnknownStorePolicy::Reject)
    );
    assert_eq!(
        "sentinel".parse::<UnknownStorePolicy>(),
        Ok(UnknownStorePolicy::Sentinel)
    );
    assert!("quarantine".parse::<UnknownStorePolicy>().is_err());
    assert_eq!(UnknownStorePolicy::default(), UnknownStorePolicy::Reject);
}

#[test]
fn load_store_catalog_lowercases_names() {
    let file = write_yaml(concat!(
        "stores:\n",
        "  - name: Voli\n",
        "    namespace: db03ea1b-1f65-4882-85ed-5b73310b089a\n",
        "    currency_symbol: \"€\"\n",
        "    discount_dates_omit_year: true\n",
    ));
    let catalog = load_store_catalog(file.path()).expect("catalog loads");
    assert_eq!(catalog.stores.len(), 1);
    assert_eq!(catalog.stores[0].name, "voli");
    assert!(catalog.stores[0].discount_dates_omit_year);
}

#[test]
fn load_store_catalog_defaults_omit_year_flag() {
    let file = write_yaml(concat!(
        "stores:\n",
        "  - name: idea\n",
        "    namespace: 8b6eca61-ced0-48a7-b73b-16768e2b8c76\n",
        "    currency_symbol: \"€\"\n",
    ));
    let catalog = load_store_catalog(file.path()).expect("catalog loads");
    assert!(!catalog.stores[0].discount_dates_omit_year);
}

#[test]
fn load_store_catalog_rejects_duplicate_names() {
    let file = write_yaml(concat!(
        "stores:\n",
        "  - name: voli\n",
        "    namespace: db03ea1b-1f65-4882-85ed-5b73310b089a\n",
        "    currency_symbol: \"€\"\n",
        "  - name: VOLI\n",
        "    namespace: 8b6eca61-ced0-48a7-b73b-16768e2b8c76\n",
        "    currency_symbol: \"€\"\n",
    ));
    let err = load_store_catalog(file.path()).unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref msg) if msg.contains("duplicate store name")),
        "got: {err:?}"
    );
}

#[test]
fn load_store_catalog_rejects_duplicate_namespaces() {
    let file = write_yaml(concat!(
        "stores:\n",
        "  - name: voli\n",
        "    namespace: db03ea1b-1f65-4882-85ed-5b73310b089a\n",
        "    currency_symbol: \"€\"\n",
        "  - name: voli-online\n",
        "    namespace: db03ea1b-1f65-4882-85ed-5b73310b089a\n",
        "    currency_symbol: \"€\"\n",
    ));
    let err = load_store_catalog(file.path()).unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref msg) if msg.contains("duplicate namespace")),
        "got: {err:?}"
    );
}

#[test]
fn load_store_catalog_rejects_sentinel_namespace() {
    let file = write_yaml(concat!(
        "stores:\n",
        "  - name: voli\n",
        "    namespace: 00000000-0000-0000-0000-000000000000\n",
        "    currency_symbol: \"€\"\n",
    ));
    let err = load_store_catalog(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("sentinel")));
}

#[test]
fn load_store_catalog_rejects_empty_currency() {
    let file = write_yaml(concat!(
        "stores:\n",
        "  - name: voli\n",
        "    namespace: db03ea1b-1f65-4882-85ed-5b73310b089a\n",
        "    currency_symbol: \" \"\n",
    ));
    let err = load_store_catalog(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("currency")));
}

#[test]
fn load_store_catalog_rejects_empty_list() {
    let file = write_yaml("stores: []\n");
    let err = load_store_catalog(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn load_store_catalog_reports_missing_file() {
    let err = load_store_catalog(Path::new("/nonexistent/stores.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::StoresFileIo { .. }));
}

#[test]
fn load_store_catalog_reports_bad_yaml() {
    let file = write_yaml("stores: [this is: not valid");
    let err = load_store_catalog(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::StoresFileParse(_)));
}

#[test]
fn bundled_stores_yaml_matches_builtin() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("stores.yaml");
    let catalog = load_store_catalog(&path).expect("config/stores.yaml loads");
    assert_eq!(catalog.stores, StoreCatalog::builtin().stores);
}
