//! Date transform.

use serde_json::Value;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

use super::{FromConfig, StringTransform, Transform, present};
use crate::UrlConfig;

/// Numerals below this are not timestamps.
const MIN_TIMESTAMP: i64 = 1_000_000_000;

/// Numerals from this value up are milliseconds.
const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// Accepted date layouts, tried in order. All are read as UTC.
const FORMATS: [&[BorrowedFormatItem<'static>]; 3] = [
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]"),
    format_description!("[year][month][day] [hour]:[minute]:[second]"),
];

/// Dates from epoch numerals or formatted strings.
///
/// Integer numerals are Unix timestamps: seconds, or milliseconds once the
/// value reaches `1_000_000_000_000`. Values below `1_000_000_000` are rejected.
/// Strings are matched against `yyyy-MM-dd HH:mm:ss`, `yyyy-MM-dd HH:mm` and
/// `yyyyMMdd HH:mm:ss`. Dates encode to epoch milliseconds.
///
/// ```
/// use coax_core::transform::{DateTransform, Transform};
/// use serde_json::json;
///
/// let a = DateTransform.decode(Some(&json!("1609459200000")));
/// let b = DateTransform.decode(Some(&json!("2021-01-01 00:00:00")));
/// assert!(a.is_some());
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTransform;

impl DateTransform {
    fn from_numeral(numeral: &str) -> Option<Option<OffsetDateTime>> {
        let digits = numeral.strip_prefix(['-', '+']).unwrap_or(numeral);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let Ok(value) = numeral.parse::<i64>() else {
            return Some(None);
        };
        let date = if value < MIN_TIMESTAMP {
            None
        } else if value >= MILLIS_THRESHOLD {
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(value) * 1_000_000).ok()
        } else {
            OffsetDateTime::from_unix_timestamp(value).ok()
        };
        Some(date)
    }

    fn from_formats(s: &str) -> Option<OffsetDateTime> {
        FORMATS.iter().find_map(|format| {
            PrimitiveDateTime::parse(s, format)
                .ok()
                .map(PrimitiveDateTime::assume_utc)
        })
    }
}

impl Transform for DateTransform {
    type Value = OffsetDateTime;

    fn decode(&self, raw: Option<&Value>) -> Option<OffsetDateTime> {
        let s = StringTransform::describe(present(raw)?);
        match Self::from_numeral(&s) {
            Some(date) => date,
            None => Self::from_formats(&s),
        }
    }

    fn encode(&self, value: Option<&OffsetDateTime>) -> Option<Value> {
        let millis = value?.unix_timestamp_nanos() / 1_000_000;
        i64::try_from(millis).ok().map(Value::from)
    }
}

impl FromConfig for DateTransform {
    fn from_config(_config: &UrlConfig) -> Self {
        Self
    }
}
