use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::StableProductKey;

/// Status written on every scraped record.
pub const DEFAULT_STATUS: &str = "published";

/// Quality score assigned until a scoring pass computes a real one.
pub const DEFAULT_QUALITY_SCORE: &str = "E";

/// A grocery product as persisted in the document store.
///
/// Serialized with camelCase keys. Every field except the identity fields is
/// defaulted on read, so documents written before a field existed still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalProduct {
    /// Durable external handle. Freshly generated for every scrape and
    /// replaced by the stored value during reconciliation.
    pub id: Uuid,
    pub store_namespace: Uuid,
    /// Join key against historical records; see [`crate::identity`].
    pub stable_key: StableProductKey,
    /// Lower-cased store name, e.g. `"voli"`.
    pub store: String,
    #[serde(default)]
    pub barcode: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brief_description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub quality_score: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: DescriptionBlock,
    #[serde(default)]
    pub nutrition: NutritionBlock,
    #[serde(default)]
    pub price: PriceBlock,
}

/// Label-derived product description. Every field is `""` when the scrape
/// carried no value for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescriptionBlock {
    /// Storage / maintenance instructions.
    pub maintenance: String,
    pub country_of_origin: String,
    pub producer: String,
    /// Importer.
    pub imports: String,
    pub ingredients: String,
    pub expiry_date: String,
    pub allergens: String,
    pub alcohol: String,
    pub additional_information: String,
}

/// Nutrition values per 100 g/ml as scraped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NutritionBlock {
    /// Free text, typically `"1046 kJ / 250 kcal"`.
    pub energy: String,
    pub fats: f64,
    pub saturated_fats: f64,
    pub proteins: f64,
    pub carbs: f64,
    pub sugar: f64,
    pub fibers: f64,
    pub salt: f64,
}

/// Price snapshot taken at scrape time. Prices are kept as the scraped text
/// with the currency symbol removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceBlock {
    /// Capture date, `DD.MM.YYYY.`.
    pub date: String,
    /// Discount percentage without the `%` sign, e.g. `"-20"`.
    pub discount_amount: String,
    pub discount_start_date: String,
    pub discount_end_date: String,
    pub discount_price: String,
    pub regular_price: String,
}

impl PriceBlock {
    #[must_use]
    pub fn has_discount(&self) -> bool {
        !self.discount_price.is_empty()
    }
}
