//! Data kinds and text coercion
//!
//! Each supported field kind is bound to a pure format/parse pair,
//! selected by explicit `match` dispatch. Formatting turns a typed value
//! into canonical cell text; parsing is its inverse. A `None` value
//! formats to the empty string, and empty text parses back to `None`.

use std::fmt;
use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::error::CoercionError;
use crate::value::FieldValue;

/// Pattern applied to date/time fields whose descriptor has none
pub const DEFAULT_DATETIME_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

/// The semantic data category of a mapped field
///
/// The set is closed: every kind has format/parse behavior, so the
/// "unmapped kind" failure class of loosely-typed mappers cannot occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    /// Free text
    Text,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    Long,
    /// 8-bit signed integer
    Byte,
    /// 16-bit signed integer
    Short,
    /// Boolean (`true`/`false`)
    Boolean,
    /// 64-bit float
    Double,
    /// 32-bit float
    Float,
    /// Single character
    Char,
    /// Arbitrary-precision decimal
    Decimal,
    /// Date/time, rendered through a strftime pattern
    DateTime,
}

impl DataKind {
    /// Lowercase kind name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            DataKind::Text => "text",
            DataKind::Integer => "integer",
            DataKind::Long => "long",
            DataKind::Byte => "byte",
            DataKind::Short => "short",
            DataKind::Boolean => "boolean",
            DataKind::Double => "double",
            DataKind::Float => "float",
            DataKind::Char => "char",
            DataKind::Decimal => "decimal",
            DataKind::DateTime => "datetime",
        }
    }

    /// Format a field value as cell text
    ///
    /// `None` formats to the empty string for every kind. A value whose
    /// variant does not match this kind fails with
    /// [`CoercionError::KindMismatch`].
    pub fn format(
        &self,
        value: Option<&FieldValue>,
        pattern: Option<&str>,
    ) -> Result<String, CoercionError> {
        let Some(value) = value else {
            return Ok(String::new());
        };

        match (self, value) {
            (DataKind::Text, FieldValue::Text(s)) => Ok(s.clone()),
            (DataKind::Integer, FieldValue::Integer(v)) => Ok(v.to_string()),
            (DataKind::Long, FieldValue::Long(v)) => Ok(v.to_string()),
            (DataKind::Byte, FieldValue::Byte(v)) => Ok(v.to_string()),
            (DataKind::Short, FieldValue::Short(v)) => Ok(v.to_string()),
            (DataKind::Boolean, FieldValue::Boolean(v)) => Ok(v.to_string()),
            (DataKind::Double, FieldValue::Double(v)) => Ok(v.to_string()),
            (DataKind::Float, FieldValue::Float(v)) => Ok(v.to_string()),
            (DataKind::Char, FieldValue::Char(v)) => Ok(v.to_string()),
            (DataKind::Decimal, FieldValue::Decimal(v)) => Ok(v.to_string()),
            (DataKind::DateTime, FieldValue::DateTime(v)) => {
                format_datetime(v, pattern.unwrap_or(DEFAULT_DATETIME_PATTERN))
            }
            (kind, value) => Err(CoercionError::KindMismatch {
                expected: *kind,
                actual: value.kind(),
            }),
        }
    }

    /// Parse cell text into a field value
    ///
    /// Empty (or whitespace-only) text parses to `None` rather than
    /// raising. Malformed text fails with [`CoercionError::Malformed`]
    /// carrying the raw text and this kind.
    pub fn parse(
        &self,
        text: &str,
        pattern: Option<&str>,
    ) -> Result<Option<FieldValue>, CoercionError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let malformed = || CoercionError::Malformed {
            text: text.to_string(),
            kind: *self,
        };

        let value = match self {
            DataKind::Text => FieldValue::Text(text.to_string()),
            DataKind::Integer => FieldValue::Integer(trimmed.parse().map_err(|_| malformed())?),
            DataKind::Long => FieldValue::Long(trimmed.parse().map_err(|_| malformed())?),
            DataKind::Byte => FieldValue::Byte(trimmed.parse().map_err(|_| malformed())?),
            DataKind::Short => FieldValue::Short(trimmed.parse().map_err(|_| malformed())?),
            DataKind::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "true" => FieldValue::Boolean(true),
                "false" => FieldValue::Boolean(false),
                _ => return Err(malformed()),
            },
            DataKind::Double => FieldValue::Double(trimmed.parse().map_err(|_| malformed())?),
            DataKind::Float => FieldValue::Float(trimmed.parse().map_err(|_| malformed())?),
            DataKind::Char => {
                let mut chars = trimmed.chars();
                let first = chars.next().ok_or_else(malformed)?;
                if chars.next().is_some() {
                    return Err(malformed());
                }
                FieldValue::Char(first)
            }
            DataKind::Decimal => {
                FieldValue::Decimal(trimmed.parse::<Decimal>().map_err(|_| malformed())?)
            }
            DataKind::DateTime => {
                let pattern = pattern.unwrap_or(DEFAULT_DATETIME_PATTERN);
                FieldValue::DateTime(parse_datetime(trimmed, pattern).ok_or_else(malformed)?)
            }
        };

        Ok(Some(value))
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Format a date/time through a strftime pattern
///
/// The pattern is validated up front so a bad pattern surfaces as an
/// error instead of a panic inside `Display`.
fn format_datetime(dt: &NaiveDateTime, pattern: &str) -> Result<String, CoercionError> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(CoercionError::BadPattern {
            pattern: pattern.to_string(),
        });
    }

    let mut out = String::new();
    if write!(out, "{}", dt.format_with_items(items.iter())).is_err() {
        return Err(CoercionError::BadPattern {
            pattern: pattern.to_string(),
        });
    }
    Ok(out)
}

/// Parse text as a date/time, accepting date-only patterns at midnight
fn parse_datetime(text: &str, pattern: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, pattern) {
        return Some(dt);
    }
    NaiveDate::parse_from_str(text, pattern)
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(kind: DataKind, value: FieldValue, pattern: Option<&str>) {
        let text = kind.format(Some(&value), pattern).unwrap();
        let parsed = kind.parse(&text, pattern).unwrap();
        assert_eq!(parsed, Some(value), "kind {} via {:?}", kind, text);
    }

    #[test]
    fn test_roundtrip_all_kinds() {
        roundtrip(DataKind::Text, FieldValue::Text("héllo".into()), None);
        roundtrip(DataKind::Integer, FieldValue::Integer(-42), None);
        roundtrip(DataKind::Long, FieldValue::Long(1_234_567_890_123), None);
        roundtrip(DataKind::Byte, FieldValue::Byte(-128), None);
        roundtrip(DataKind::Short, FieldValue::Short(32_000), None);
        roundtrip(DataKind::Boolean, FieldValue::Boolean(true), None);
        roundtrip(DataKind::Double, FieldValue::Double(3.25), None);
        roundtrip(DataKind::Float, FieldValue::Float(-0.5), None);
        roundtrip(DataKind::Char, FieldValue::Char('字'), None);
        roundtrip(
            DataKind::Decimal,
            FieldValue::Decimal("12.30".parse().unwrap()),
            None,
        );

        let dt = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        roundtrip(DataKind::DateTime, FieldValue::DateTime(dt), None);
        roundtrip(
            DataKind::DateTime,
            FieldValue::DateTime(dt),
            Some("%d/%m/%Y %H:%M:%S"),
        );
    }

    #[test]
    fn test_none_formats_empty() {
        for kind in [DataKind::Text, DataKind::Integer, DataKind::DateTime] {
            assert_eq!(kind.format(None, None).unwrap(), "");
        }
    }

    #[test]
    fn test_empty_parses_none() {
        for kind in [DataKind::Text, DataKind::Integer, DataKind::Decimal] {
            assert_eq!(kind.parse("", None).unwrap(), None);
            assert_eq!(kind.parse("   ", None).unwrap(), None);
        }
    }

    #[test]
    fn test_malformed_numeric() {
        let err = DataKind::Decimal.parse("12a.3", None).unwrap_err();
        match err {
            CoercionError::Malformed { text, kind } => {
                assert_eq!(text, "12a.3");
                assert_eq!(kind, DataKind::Decimal);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(DataKind::Integer.parse("4.5", None).is_err());
        assert!(DataKind::Byte.parse("300", None).is_err());
        assert!(DataKind::Boolean.parse("maybe", None).is_err());
        assert!(DataKind::Char.parse("ab", None).is_err());
    }

    #[test]
    fn test_kind_mismatch() {
        let err = DataKind::Integer
            .format(Some(&FieldValue::Text("x".into())), None)
            .unwrap_err();
        match err {
            CoercionError::KindMismatch { expected, actual } => {
                assert_eq!(expected, DataKind::Integer);
                assert_eq!(actual, DataKind::Text);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_date_only_pattern() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_time(NaiveTime::MIN);
        let text = DataKind::DateTime
            .format(Some(&FieldValue::DateTime(dt)), Some("%Y-%m-%d"))
            .unwrap();
        assert_eq!(text, "2024-01-02");

        let parsed = DataKind::DateTime.parse("2024-01-02", Some("%Y-%m-%d")).unwrap();
        assert_eq!(parsed, Some(FieldValue::DateTime(dt)));
    }

    #[test]
    fn test_bad_datetime_pattern() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_time(NaiveTime::MIN);
        assert!(DataKind::DateTime
            .format(Some(&FieldValue::DateTime(dt)), Some("%Q"))
            .is_err());
    }

    #[test]
    fn test_number_canonical_text() {
        // Container numeric cells render the same way the formatter writes them
        assert_eq!(
            DataKind::Integer.parse("42", None).unwrap(),
            Some(FieldValue::Integer(42))
        );
        assert_eq!(
            DataKind::Double.format(Some(&FieldValue::Double(42.0)), None).unwrap(),
            "42"
        );
    }
}
