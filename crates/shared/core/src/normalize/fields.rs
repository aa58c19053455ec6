//! Fallible field parsers
//!
//! Every parser returns a usable value plus an optional [`FieldIssue`]. Callers
//! decide whether an issue is fatal (identity fields) or merely recorded.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::values::Timestamp;

/// What was wrong with a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldIssue {
    Missing,
    Unparsable(String),
}

/// A parsed value, possibly defaulted
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub value: T,
    pub issue: Option<FieldIssue>,
}

impl<T> Parsed<T> {
    fn ok(value: T) -> Self {
        Self { value, issue: None }
    }

    fn defaulted(value: T, issue: FieldIssue) -> Self {
        Self {
            value,
            issue: Some(issue),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.issue.is_none()
    }
}

fn is_absent(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

fn decimal_from_str(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .ok()
        .or_else(|| Decimal::from_scientific(raw).ok())
        .or_else(|| raw.parse::<f64>().ok().and_then(Decimal::from_f64))
}

/// Parse a decimal from a JSON number or numeric string, defaulting to zero
pub fn decimal(value: Option<&Value>) -> Parsed<Decimal> {
    if is_absent(value) {
        return Parsed::defaulted(Decimal::ZERO, FieldIssue::Missing);
    }

    let parsed = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Decimal::from)
            .or_else(|| n.as_u64().map(Decimal::from))
            .or_else(|| decimal_from_str(&n.to_string())),
        Some(Value::String(s)) => decimal_from_str(s),
        _ => None,
    };

    match parsed {
        Some(d) => Parsed::ok(d),
        None => Parsed::defaulted(Decimal::ZERO, FieldIssue::Unparsable(render(value))),
    }
}

/// Parse a non-negative integer (decimal or `0x` hex), defaulting to zero
pub fn unsigned(value: Option<&Value>) -> Parsed<u64> {
    if is_absent(value) {
        return Parsed::defaulted(0, FieldIssue::Missing);
    }

    let parsed = match value {
        Some(Value::Number(n)) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Some(Value::String(s)) => {
            let s = s.trim();
            match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                Some(hex) => u64::from_str_radix(hex, 16).ok(),
                None => s.parse::<u64>().ok(),
            }
        }
        _ => None,
    };

    match parsed {
        Some(v) => Parsed::ok(v),
        None => Parsed::defaulted(0, FieldIssue::Unparsable(render(value))),
    }
}

/// Parse an ISO-8601 timestamp or Unix seconds, defaulting to the epoch
pub fn timestamp(value: Option<&Value>) -> Parsed<Timestamp> {
    let epoch = DateTime::<Utc>::UNIX_EPOCH;
    if is_absent(value) {
        return Parsed::defaulted(epoch, FieldIssue::Missing);
    }

    let parsed = match value {
        Some(Value::String(s)) => parse_timestamp_str(s.trim()),
        Some(Value::Number(n)) => n.as_i64().and_then(|secs| DateTime::from_timestamp(secs, 0)),
        _ => None,
    };

    match parsed {
        Some(ts) => Parsed::ok(ts),
        None => Parsed::defaulted(epoch, FieldIssue::Unparsable(render(value))),
    }
}

fn parse_timestamp_str(raw: &str) -> Option<Timestamp> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    // Offset-less timestamps are taken as UTC
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    raw.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

/// Read a string-ish field; objects contribute their `address` member
pub fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Object(map)) => map
            .get("address")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

/// Truthiness of a flag field (`true`, non-zero numbers, `"true"`/`"yes"`/`"1"`)
pub fn flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        _ => false,
    }
}

fn render(value: Option<&Value>) -> String {
    value.map(Value::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_decimal_accepts_numbers_and_strings() {
        assert_eq!(decimal(Some(&json!(12))).value, dec!(12));
        assert_eq!(decimal(Some(&json!("0.0015"))).value, dec!(0.0015));
        assert_eq!(decimal(Some(&json!(2.5))).value, dec!(2.5));
        assert!(decimal(Some(&json!("1e-9"))).is_ok());
        assert_eq!(decimal(Some(&json!("1e-9"))).value, dec!(0.000000001));
    }

    #[test]
    fn test_decimal_defaults_to_zero() {
        let missing = decimal(None);
        assert_eq!(missing.value, Decimal::ZERO);
        assert_eq!(missing.issue, Some(FieldIssue::Missing));

        let garbage = decimal(Some(&json!("not-a-number")));
        assert_eq!(garbage.value, Decimal::ZERO);
        assert!(matches!(garbage.issue, Some(FieldIssue::Unparsable(_))));

        let null = decimal(Some(&Value::Null));
        assert_eq!(null.issue, Some(FieldIssue::Missing));
    }

    #[test]
    fn test_unsigned_accepts_hex_and_strings() {
        assert_eq!(unsigned(Some(&json!(18_000_000))).value, 18_000_000);
        assert_eq!(unsigned(Some(&json!("42"))).value, 42);
        assert_eq!(unsigned(Some(&json!("0x10"))).value, 16);
        assert!(!unsigned(Some(&json!(-1))).is_ok());
    }

    #[test]
    fn test_timestamp_formats() {
        let iso = timestamp(Some(&json!("2024-03-01T12:00:00.000Z")));
        assert!(iso.is_ok());
        assert_eq!(iso.value.timestamp(), 1_709_294_400);

        let naive = timestamp(Some(&json!("2024-03-01T12:00:00")));
        assert_eq!(naive.value.timestamp(), 1_709_294_400);

        let unix = timestamp(Some(&json!(1_709_294_400)));
        assert_eq!(unix.value.timestamp(), 1_709_294_400);

        let bad = timestamp(Some(&json!("yesterday")));
        assert_eq!(bad.value, DateTime::<Utc>::UNIX_EPOCH);
        assert!(!bad.is_ok());
    }

    #[test]
    fn test_text_and_flag() {
        assert_eq!(text(Some(&json!({"address": "0xabc"}))), "0xabc");
        assert_eq!(text(None), "");
        assert!(flag(Some(&json!(true))));
        assert!(flag(Some(&json!("yes"))));
        assert!(!flag(Some(&json!(0))));
        assert!(!flag(None));
    }
}
