//! Raw scraped record shapes, as emitted by the Voli and Idea scrapers.
//!
//! ## Observed differences between the two scrapers
//!
//! ### `product_id`
//! Voli emits a JSON number, Idea a numeric string. Both are kept verbatim via
//! [`ScalarValue`] and stringified before key derivation.
//!
//! ### Prices
//! Voli writes `"3.50€"`; Idea writes `"3,50 €"`. Discounted items carry a
//! `discount_info` object and move the regular price to `price_info.old_price`.
//!
//! ### `barcodes`
//! Absent on Voli, a list of strings on Idea. A bare string is also accepted.
//!
//! ### Nutrition
//! Flat top-level fields. Values are numbers, numeric strings, or absent.
//!
//! ### `description`
//! Object keyed by the site's own labels (`"Zemlja"`, `"Sastojci"`, ...).
//! Missing entirely on many Voli products.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A JSON scalar that scrapers emit as either a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Number(serde_json::Number),
    Text(String),
}

impl std::fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => n.fmt(f),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Barcode field: absent, a single code, or a list of codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawBarcodes {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPriceInfo {
    /// Set when the product is not discounted.
    #[serde(default)]
    pub current_price: Option<String>,
    /// Set on discounted products.
    #[serde(default)]
    pub discounted_price: Option<String>,
    /// Pre-discount price, set on discounted products.
    #[serde(default)]
    pub old_price: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDiscountInfo {
    /// Percentage with trailing sign, e.g. `"-20%"`.
    #[serde(default)]
    pub discount: Option<String>,
    /// Window `START-END`, e.g. `"01.03-15.03"` (Voli) or
    /// `"01.03.2024.-15.03.2024."` (Idea).
    #[serde(default)]
    pub duration: Option<String>,
}

/// One product as scraped from a store's site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawScrapedProduct {
    pub store: String,
    pub product_id: ScalarValue,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub brief_product_description: Option<String>,
    /// Label → value map; values are normally strings.
    #[serde(default)]
    pub description: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default)]
    pub price_info: Option<RawPriceInfo>,
    #[serde(default)]
    pub discount_info: Option<RawDiscountInfo>,
    #[serde(default)]
    pub energy: Option<ScalarValue>,
    #[serde(default)]
    pub fats: Option<ScalarValue>,
    #[serde(default)]
    pub saturated_fats: Option<ScalarValue>,
    #[serde(default)]
    pub proteins: Option<ScalarValue>,
    #[serde(default)]
    pub carbs: Option<ScalarValue>,
    #[serde(default)]
    pub sugar: Option<ScalarValue>,
    #[serde(default)]
    pub fiber: Option<ScalarValue>,
    #[serde(default)]
    pub salt: Option<ScalarValue>,
    #[serde(default)]
    pub barcodes: Option<RawBarcodes>,
    #[serde(default)]
    pub image_urls: Option<Vec<String>>,
}

impl RawScrapedProduct {
    /// The store-local product id as a trimmed string.
    #[must_use]
    pub fn local_id(&self) -> String {
        self.product_id.to_string().trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn numeric_and_string_product_ids_stringify_the_same() {
        let voli: RawScrapedProduct =
            serde_json::from_value(json!({ "store": "Voli", "product_id": 10234 })).unwrap();
        let idea: RawScrapedProduct =
            serde_json::from_value(json!({ "store": "Idea", "product_id": "10234" })).unwrap();
        assert_eq!(voli.local_id(), "10234");
        assert_eq!(idea.local_id(), "10234");
    }

    #[test]
    fn large_numeric_ids_keep_precision() {
        let raw: RawScrapedProduct = serde_json::from_value(
            json!({ "store": "Idea", "product_id": 9_007_199_254_740_993_u64 }),
        )
        .unwrap();
        assert_eq!(raw.local_id(), "9007199254740993");
    }

    #[test]
    fn barcodes_accept_string_or_list() {
        let one: RawBarcodes = serde_json::from_value(json!("111")).unwrap();
        let many: RawBarcodes = serde_json::from_value(json!(["111", "222"])).unwrap();
        assert_eq!(one, RawBarcodes::One("111".to_string()));
        assert_eq!(
            many,
            RawBarcodes::Many(vec!["111".to_string(), "222".to_string()])
        );
    }

    #[test]
    fn optional_sections_default_to_none() {
        let raw: RawScrapedProduct =
            serde_json::from_value(json!({ "store": "Voli", "product_id": 1 })).unwrap();
        assert!(raw.description.is_none());
        assert!(raw.price_info.is_none());
        assert!(raw.discount_info.is_none());
        assert!(raw.barcodes.is_none());
        assert!(raw.image_urls.is_none());
        assert_eq!(raw.name, "");
    }

    #[test]
    fn full_voli_record_deserializes() {
        let raw: RawScrapedProduct = serde_json::from_value(json!({
            "store": "Voli",
            "product_id": 555,
            "name": "Jogurt 1kg",
            "category_name": "Mliječni proizvodi",
            "price_info": { "discounted_price": "1.59€", "old_price": "1.99€" },
            "discount_info": { "discount": "-20%", "duration": "01.03-15.03" },
            "fats": 2.8,
            "sugar": "4,1",
            "image_urls": ["https://cdn.example/j.jpg"]
        }))
        .unwrap();
        assert_eq!(
            raw.discount_info.and_then(|d| d.duration).as_deref(),
            Some("01.03-15.03")
        );
        assert_eq!(raw.sugar, Some(ScalarValue::Text("4,1".to_string())));
    }
}
