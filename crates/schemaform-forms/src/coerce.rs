//! Coercion between input-box text and stored values.
//!
//! The `format_*` functions turn the text of an input into the value that is
//! validated and saved. The `parse_*` functions go the other way: they render
//! a value found in the store document as the initial text of an input.
//!
//! Parsers receive raw JSON because the store is untrusted; a value of the
//! wrong shape yields a [`StoredValueError`] which the codec turns into a
//! blank field.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Largest integer an `f64` holds exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A calendar date split into numeric parts, as saved in the store.
///
/// No calendar check is applied: `{ year: 2022, month: 13, day: 1 }` is a
/// valid `DateParts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateParts {
    /// Four-digit year.
    pub year: i64,
    /// Month, `1..=12` when produced by a date input.
    pub month: i64,
    /// Day of month.
    pub day: i64,
}

/// Result of coercing money text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoneyInput {
    /// The input was emptied; saved as `null`.
    Cleared,
    /// A canonical decimal amount.
    Amount(f64),
    /// Text that is not a canonical number.
    NotANumber,
}

/// Result of coercing date text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput {
    /// The input was emptied; saved as `null`.
    Cleared,
    /// A `YYYY-MM-DD` date split at fixed offsets.
    Date(DateParts),
    /// Text whose digit groups could not be read.
    Unreadable,
}

/// A coerced form value, ready for validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    /// Text of a `string` field, unchanged.
    Text(String),
    /// A `money` field.
    Money(MoneyInput),
    /// A `date` field.
    Date(DateInput),
}

impl Coerced {
    /// Converts the coerced value into the value saved in the store.
    ///
    /// Returns `None` when the value has nothing to contribute (not a number,
    /// unreadable date).
    pub fn to_stored(&self) -> Option<StoredValue> {
        match self {
            Self::Text(text) => Some(StoredValue::Text(text.clone())),
            Self::Money(MoneyInput::Cleared) | Self::Date(DateInput::Cleared) => {
                Some(StoredValue::Null)
            }
            Self::Money(MoneyInput::Amount(n)) => Some(StoredValue::Money(*n)),
            Self::Date(DateInput::Date(parts)) => Some(StoredValue::Date(*parts)),
            Self::Money(MoneyInput::NotANumber) | Self::Date(DateInput::Unreadable) => None,
        }
    }
}

/// A typed value of a store entity.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    /// An explicitly cleared money or date field.
    Null,
    /// Raw text of a `string` field.
    Text(String),
    /// A money amount.
    Money(f64),
    /// A date.
    Date(DateParts),
}

impl From<&StoredValue> for JsonValue {
    fn from(value: &StoredValue) -> Self {
        match value {
            StoredValue::Null => Self::Null,
            StoredValue::Text(text) => Self::String(text.clone()),
            StoredValue::Money(n) => money_to_json(*n),
            StoredValue::Date(parts) => serde_json::json!({
                "year": parts.year,
                "month": parts.month,
                "day": parts.day,
            }),
        }
    }
}

/// A stored value whose shape does not fit the field's parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoredValueError {
    /// The JSON type is not one the parser accepts.
    #[error("expected {expected}, found {found}")]
    Mismatch {
        /// What the parser accepts.
        expected: &'static str,
        /// The JSON type that was found.
        found: &'static str,
    },
    /// The date parts do not name a calendar day.
    #[error("{year}-{month}-{day} is not a calendar date")]
    InvalidDate {
        /// Stored year.
        year: i64,
        /// Stored month.
        month: i64,
        /// Stored day.
        day: i64,
    },
}

/// Renders a number the way it round-trips: shortest decimal form, no exponent,
/// and negative zero as `0`.
#[allow(clippy::float_cmp)]
pub fn render_number(n: f64) -> String {
    if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

/// Coerces money text.
///
/// Empty text clears the field. Otherwise the text must be exactly the
/// canonical rendering of the number it parses to, which rejects `"007"`,
/// `"1e3"`, `"1.50"`, surrounding whitespace and any trailing junk.
///
/// # Examples
///
/// ```
/// use schemaform_forms::coerce::{format_money, MoneyInput};
///
/// assert_eq!(format_money(""), MoneyInput::Cleared);
/// assert_eq!(format_money("123"), MoneyInput::Amount(123.0));
/// assert_eq!(format_money("007"), MoneyInput::NotANumber);
/// ```
pub fn format_money(text: &str) -> MoneyInput {
    if text.is_empty() {
        return MoneyInput::Cleared;
    }
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() && render_number(n) == text => MoneyInput::Amount(n),
        _ => MoneyInput::NotANumber,
    }
}

/// Coerces date text in `YYYY-MM-DD` form.
///
/// The text is split at fixed offsets: year `[0..4]`, month `[5..7]`, day
/// `[8..]`. Month and day ranges are not checked.
pub fn format_date(text: &str) -> DateInput {
    if text.is_empty() {
        return DateInput::Cleared;
    }
    let part = |range: std::ops::Range<usize>| text.get(range)?.parse::<i64>().ok();
    let day = text.get(8..).and_then(|d| d.parse::<i64>().ok());
    match (part(0..4), part(5..7), day) {
        (Some(year), Some(month), Some(day)) => DateInput::Date(DateParts { year, month, day }),
        _ => DateInput::Unreadable,
    }
}

/// Renders a stored money value as input text.
///
/// Absent and `null` render as `""`. Text is rendered verbatim, since older
/// stores kept amounts as strings.
pub fn parse_money(value: Option<&JsonValue>) -> Result<String, StoredValueError> {
    match value {
        None | Some(JsonValue::Null) => Ok(String::new()),
        Some(JsonValue::Number(n)) => Ok(n.as_f64().map_or_else(|| n.to_string(), render_number)),
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(other) => Err(mismatch("number", other)),
    }
}

/// Renders a stored date as `YYYY-MM-DD` input text.
///
/// The parts go through [`chrono::NaiveDate`], which zero-pads them and
/// rejects days that do not exist.
pub fn parse_date(value: Option<&JsonValue>) -> Result<String, StoredValueError> {
    let object = match value {
        None | Some(JsonValue::Null) => return Ok(String::new()),
        Some(JsonValue::Object(object)) => object,
        Some(other) => return Err(mismatch("date object", other)),
    };

    let component = |name: &str| -> Result<i64, StoredValueError> {
        match object.get(name) {
            Some(value) => date_component(value),
            None => Err(StoredValueError::Mismatch {
                expected: "date object",
                found: "object",
            }),
        }
    };
    let (year, month, day) = (component("year")?, component("month")?, component("day")?);

    let invalid = StoredValueError::InvalidDate { year, month, day };
    let date = match (i32::try_from(year), u32::try_from(month), u32::try_from(day)) {
        (Ok(y), Ok(m), Ok(d)) => chrono::NaiveDate::from_ymd_opt(y, m, d),
        _ => None,
    };
    date.map(|d| d.format("%Y-%m-%d").to_string()).ok_or(invalid)
}

/// Renders a stored string value as input text.
///
/// Numbers and booleans render through their string form; `null`, arrays
/// and objects are rejected.
pub fn parse_string(value: Option<&JsonValue>) -> Result<String, StoredValueError> {
    match value {
        None => Ok(String::new()),
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(JsonValue::Number(n)) => Ok(n.to_string()),
        Some(JsonValue::Bool(b)) => Ok(b.to_string()),
        Some(other) => Err(mismatch("string", other)),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn money_to_json(n: f64) -> JsonValue {
    if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER {
        JsonValue::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(JsonValue::Null, JsonValue::Number)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn date_component(value: &JsonValue) -> Result<i64, StoredValueError> {
    let parsed = match value {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        JsonValue::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| mismatch("integer", value))
}

fn mismatch(expected: &'static str, found: &JsonValue) -> StoredValueError {
    StoredValueError::Mismatch {
        expected,
        found: json_type_name(found),
    }
}

const fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
