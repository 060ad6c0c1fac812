//! Pure extractors from a [`RawScrapedProduct`] into the persisted blocks.
//!
//! Every output field is set explicitly: missing strings become `""`, missing
//! numbers `0`, missing lists `[]`.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use shelfsync_core::{DescriptionBlock, NutritionBlock, PriceBlock, StoreProfile};

use crate::error::IngestError;
use crate::types::{RawBarcodes, RawScrapedProduct, ScalarValue};

/// Format shared by capture dates and completed discount dates.
const DATE_FORMAT: &str = "%d.%m.%Y.";

/// Formats a capture date as `DD.MM.YYYY.`.
#[must_use]
pub fn format_capture_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Builds the nutrition block. Absent values default to `0` (`""` for energy).
///
/// Label text is read leniently: the first number in the value is taken, so
/// `"<0,5 g"` yields `0.5` and `"1,2 g/100g"` yields `1.2`. A value with no
/// number in it is logged and recorded as `0`.
#[must_use]
pub fn extract_nutrition(raw: &RawScrapedProduct) -> NutritionBlock {
    NutritionBlock {
        energy: raw
            .energy
            .as_ref()
            .map(|v| v.to_string().trim().to_string())
            .unwrap_or_default(),
        fats: nutrient("fats", raw.fats.as_ref()),
        saturated_fats: nutrient("saturated_fats", raw.saturated_fats.as_ref()),
        proteins: nutrient("proteins", raw.proteins.as_ref()),
        carbs: nutrient("carbs", raw.carbs.as_ref()),
        sugar: nutrient("sugar", raw.sugar.as_ref()),
        fibers: nutrient("fiber", raw.fiber.as_ref()),
        salt: nutrient("salt", raw.salt.as_ref()),
    }
}

fn nutrient(field: &'static str, value: Option<&ScalarValue>) -> f64 {
    let parsed = match value {
        None => return 0.0,
        Some(ScalarValue::Number(n)) => n.as_f64(),
        Some(ScalarValue::Text(text)) if text.trim().is_empty() => return 0.0,
        Some(ScalarValue::Text(text)) => first_number(text),
    };
    parsed.unwrap_or_else(|| {
        tracing::warn!(
            field,
            value = %value.map(ToString::to_string).unwrap_or_default(),
            "nutrition value has no number; recording 0"
        );
        0.0
    })
}

/// First run of digits in `text`, with `,` or `.` as the decimal separator.
fn first_number(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    digits.trim_end_matches('.').parse::<f64>().ok()
}

/// Builds the price block for a scrape captured on `captured_on`.
///
/// # Errors
///
/// Returns [`IngestError`] if a required price or discount field is missing
/// or cannot be parsed.
pub fn extract_price(
    raw: &RawScrapedProduct,
    profile: &StoreProfile,
    captured_on: NaiveDate,
) -> Result<PriceBlock, IngestError> {
    let price_info = raw
        .price_info
        .as_ref()
        .ok_or(IngestError::MissingField { field: "price_info" })?;

    let date = format_capture_date(captured_on);

    let Some(discount) = raw.discount_info.as_ref() else {
        let current = required("price_info.current_price", price_info.current_price.as_ref())?;
        return Ok(PriceBlock {
            date,
            regular_price: strip_currency("price_info.current_price", current, profile)?,
            ..PriceBlock::default()
        });
    };

    let percentage = required("discount_info.discount", discount.discount.as_ref())?;
    let duration = required("discount_info.duration", discount.duration.as_ref())?;
    let discounted = required(
        "price_info.discounted_price",
        price_info.discounted_price.as_ref(),
    )?;
    let old = required("price_info.old_price", price_info.old_price.as_ref())?;

    let (start, end) = split_duration(duration, profile, captured_on)?;

    Ok(PriceBlock {
        date,
        discount_amount: parse_percentage(percentage)?,
        discount_start_date: start,
        discount_end_date: end,
        discount_price: strip_currency("price_info.discounted_price", discounted, profile)?,
        regular_price: strip_currency("price_info.old_price", old, profile)?,
    })
}

fn required<'a>(field: &'static str, value: Option<&'a String>) -> Result<&'a str, IngestError> {
    value
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
        .ok_or(IngestError::MissingField { field })
}

/// Removes the store's trailing currency symbol and checks the remainder is a
/// decimal amount. The amount text is returned unchanged otherwise.
fn strip_currency(
    field: &'static str,
    raw: &str,
    profile: &StoreProfile,
) -> Result<String, IngestError> {
    let trimmed = raw.trim();
    let amount = trimmed
        .strip_suffix(profile.currency_symbol.trim())
        .unwrap_or(trimmed)
        .trim_end();

    if amount.is_empty() || Decimal::from_str(&amount.replace(',', ".")).is_err() {
        return Err(IngestError::InvalidPrice {
            field,
            value: raw.to_string(),
        });
    }
    Ok(amount.to_string())
}

fn parse_percentage(raw: &str) -> Result<String, IngestError> {
    let trimmed = raw.trim();
    let value = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    if value.is_empty() || Decimal::from_str(&value.replace(',', ".")).is_err() {
        return Err(IngestError::InvalidDiscount {
            value: raw.to_string(),
        });
    }
    Ok(value.to_string())
}

/// Splits `START-END` into its two dates.
///
/// For stores whose windows omit the year, each `DD.MM` fragment is completed
/// as `DD.MM.YYYY.` using the capture year. A window whose end falls before
/// its start spans New Year: it started last year when the capture itself
/// precedes the start, and otherwise ends next year.
fn split_duration(
    raw: &str,
    profile: &StoreProfile,
    captured_on: NaiveDate,
) -> Result<(String, String), IngestError> {
    let invalid = |reason: &str| IngestError::InvalidDuration {
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    let (start, end) = raw
        .split_once('-')
        .ok_or_else(|| invalid("expected START-END"))?;
    let (start, end) = (start.trim(), end.trim());
    if start.is_empty() || end.is_empty() {
        return Err(invalid("empty start or end date"));
    }

    if !profile.discount_dates_omit_year {
        return Ok((start.to_string(), end.to_string()));
    }

    let start = parse_day_month(start).ok_or_else(|| invalid("start is not DD.MM"))?;
    let end = parse_day_month(end).ok_or_else(|| invalid("end is not DD.MM"))?;

    let year = captured_on.year();
    let unresolvable = || invalid("not a calendar date");
    let mut start_date = in_year(start, year).ok_or_else(unresolvable)?;
    let mut end_date = in_year(end, year).ok_or_else(unresolvable)?;
    if end_date < start_date {
        if captured_on < start_date {
            start_date = in_year(start, year - 1).ok_or_else(unresolvable)?;
        } else {
            end_date = in_year(end, year + 1).ok_or_else(unresolvable)?;
        }
    }

    Ok((
        start_date.format(DATE_FORMAT).to_string(),
        end_date.format(DATE_FORMAT).to_string(),
    ))
}

/// Parses `DD.MM` (trailing `.` optional) into `(day, month)`.
fn parse_day_month(fragment: &str) -> Option<(u32, u32)> {
    let mut parts = fragment.trim_end_matches('.').split('.');
    let day = parts.next()?.trim().parse::<u32>().ok()?;
    let month = parts.next()?.trim().parse::<u32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((day, month))
}

/// Places `(day, month)` in `year`. `29.02` in a common year becomes `28.02`.
fn in_year((day, month): (u32, u32), year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).or_else(|| {
        if (day, month) == (29, 2) {
            NaiveDate::from_ymd_opt(year, 2, 28)
        } else {
            None
        }
    })
}

/// Maps the site's description labels onto the canonical block.
#[must_use]
pub fn extract_description(raw: &RawScrapedProduct) -> DescriptionBlock {
    let Some(labels) = raw.description.as_ref() else {
        return DescriptionBlock::default();
    };

    let field = |label: &str| -> String {
        match labels.get(label) {
            None | Some(serde_json::Value::Null) => String::new(),
            Some(serde_json::Value::String(s)) => s.trim().to_string(),
            Some(other) => other.to_string(),
        }
    };

    DescriptionBlock {
        maintenance: field("Čuvanje"),
        country_of_origin: field("Zemlja"),
        producer: field("Proizvođač"),
        imports: field("Uvozi"),
        ingredients: field("Sastojci"),
        expiry_date: field("Rok upotrebe"),
        allergens: field("Alergeni"),
        alcohol: field("Alkohol"),
        additional_information: field("Dodatne informacije"),
    }
}

/// Keeps only the first barcode; absent or empty lists yield `""`.
#[must_use]
pub fn extract_barcode(barcodes: Option<&RawBarcodes>) -> String {
    match barcodes {
        None => String::new(),
        Some(RawBarcodes::One(code)) => code.trim().to_string(),
        Some(RawBarcodes::Many(codes)) => codes
            .first()
            .map(|c| c.trim().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
