//! Normalization of scraped grocery records into [`shelfsync_core::CanonicalProduct`].

pub mod error;
pub mod extract;
pub mod normalize;
pub mod types;

pub use error::IngestError;
pub use extract::{
    extract_barcode, extract_description, extract_nutrition, extract_price, format_capture_date,
};
pub use normalize::normalize_product;
pub use types::{RawBarcodes, RawDiscountInfo, RawPriceInfo, RawScrapedProduct, ScalarValue};
