use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dates::parse_date;
use crate::resolver::{resolve, RawRecord};

/// Outcome of coercing a resolved field into a typed value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Parsed<T> {
    /// No alias matched a present value
    Missing,
    /// A value was present but could not be coerced; holds the raw text
    Invalid(String),
    Value(T),
}

impl<T> Parsed<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Parsed::Value(value) => Some(value),
            Parsed::Missing | Parsed::Invalid(_) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Parsed::Value(value) => Some(value),
            Parsed::Missing | Parsed::Invalid(_) => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Parsed::Missing)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Parsed::Invalid(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        match self {
            Parsed::Missing => Parsed::Missing,
            Parsed::Invalid(raw) => Parsed::Invalid(raw),
            Parsed::Value(value) => Parsed::Value(f(value)),
        }
    }
}

impl<T> Default for Parsed<T> {
    fn default() -> Self {
        Parsed::Missing
    }
}

/// Serde adapter writing a [`Parsed`] as its plain value, `null` when missing
/// or invalid.
///
/// ```rust
/// use field_resolver::Parsed;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Row {
///     #[serde(with = "field_resolver::coerce::value_or_null")]
///     code: Parsed<String>,
/// }
///
/// let row = Row { code: Parsed::Invalid("??".into()) };
/// assert_eq!(serde_json::to_string(&row).unwrap(), r#"{"code":null}"#);
/// ```
pub mod value_or_null {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Parsed;

    pub fn serialize<T, S>(parsed: &Parsed<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        parsed.value().serialize(serializer)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Parsed<T>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.map_or(Parsed::Missing, Parsed::Value))
    }
}

/// Serde adapter for numeric [`Parsed`] fields: whole numbers are written as
/// JSON integers, other values as floats, and missing or invalid as `null`.
pub mod number_or_null {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{whole_number, Parsed};

    pub fn serialize<S>(parsed: &Parsed<f64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match parsed.value() {
            Some(number) => match whole_number(*number) {
                Some(whole) => serializer.serialize_i64(whole),
                None => serializer.serialize_f64(*number),
            },
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Parsed<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<f64>::deserialize(deserializer)?.map_or(Parsed::Missing, Parsed::Value))
    }
}

/// Render a scalar JSON value as trimmed text. Arrays and objects have no
/// textual form here.
pub fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Resolve a field as trimmed text.
pub fn resolve_text(row: &RawRecord, candidates: &[&str]) -> Option<String> {
    resolve(row, candidates).and_then(scalar_text)
}

/// Resolve a field as trimmed text, or `fallback`.
pub fn resolve_text_or(row: &RawRecord, candidates: &[&str], fallback: &str) -> String {
    resolve_text(row, candidates).unwrap_or_else(|| fallback.to_string())
}

/// Resolve a field as a whole number. Fractional values are invalid.
pub fn resolve_integer(row: &RawRecord, candidates: &[&str]) -> Parsed<i64> {
    coerce(row, candidates, |value| match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole_number)),
        Value::String(s) => {
            let text = strip_numeric_noise(s);
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(whole_number))
        }
        _ => None,
    })
}

/// Resolve a field as a finite floating-point number.
pub fn resolve_number(row: &RawRecord, candidates: &[&str]) -> Parsed<f64> {
    coerce(row, candidates, value_as_f64)
}

/// Resolve a money amount as a decimal.
pub fn resolve_decimal(row: &RawRecord, candidates: &[&str]) -> Parsed<Decimal> {
    coerce(row, candidates, |value| match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(&strip_numeric_noise(s)),
        _ => None,
    })
}

/// Resolve a field as a calendar date.
pub fn resolve_date(row: &RawRecord, candidates: &[&str]) -> Parsed<NaiveDate> {
    coerce(row, candidates, |value| match value {
        Value::String(s) => parse_date(s),
        _ => None,
    })
}

/// Interpret a JSON value as a finite number, accepting numeric strings.
pub fn value_as_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => strip_numeric_noise(s).parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn coerce<T>(
    row: &RawRecord,
    candidates: &[&str],
    convert: impl FnOnce(&Value) -> Option<T>,
) -> Parsed<T> {
    match resolve(row, candidates) {
        None => Parsed::Missing,
        Some(value) => match convert(value) {
            Some(converted) => Parsed::Value(converted),
            None => Parsed::Invalid(scalar_text(value).unwrap_or_else(|| value.to_string())),
        },
    }
}

/// Drop surrounding whitespace, a leading currency symbol and thousands
/// separators: `" ₹1,250.50 "` becomes `"1250.50"`.
fn strip_numeric_noise(raw: &str) -> String {
    let text = raw.trim();
    let text = text
        .strip_prefix(['$', '₹', '€', '£'])
        .unwrap_or(text)
        .trim_start();
    text.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect()
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

#[allow(clippy::cast_possible_truncation)]
fn whole_number(value: f64) -> Option<i64> {
    // Beyond 2^53 an f64 no longer represents every integer.
    const LIMIT: f64 = 9_007_199_254_740_992.0;
    (value.is_finite() && value.fract() == 0.0 && value.abs() <= LIMIT).then(|| value as i64)
}
