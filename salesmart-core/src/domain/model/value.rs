// salesmart-core/src/domain/model/value.rs

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

/// A single cell, independent of the store it was read from.
///
/// Floating point source values are stored as `Decimal` so that rows stay
/// hashable for exact-duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Decimal(Decimal),
    Text(String),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
}

impl SqlValue {
    pub fn text(value: impl Into<String>) -> Self {
        SqlValue::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Integer view: integers, integral decimals and numeric text.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(i) => Some(*i),
            SqlValue::Decimal(d) if d.fract().is_zero() => d.to_i64(),
            SqlValue::Text(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| {
                    Decimal::from_str(s)
                        .ok()
                        .filter(|d| d.fract().is_zero())
                        .and_then(|d| d.to_i64())
                })
            }
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            SqlValue::Integer(i) => Some(Decimal::from(*i)),
            SqlValue::Decimal(d) => Some(*d),
            SqlValue::Text(s) => Decimal::from_str(s.trim()).ok(),
            _ => None,
        }
    }

    /// Text view of any scalar. `Null` has none.
    pub fn as_text(&self) -> Option<String> {
        match self {
            SqlValue::Null => None,
            SqlValue::Text(s) => Some(s.clone()),
            SqlValue::Decimal(d) => Some(d.normalize().to_string()),
            other => Some(other.to_string()),
        }
    }

    /// Renders the value as a SQL literal. Text is single-quote escaped.
    pub fn to_sql_literal(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            SqlValue::Integer(i) => i.to_string(),
            SqlValue::Decimal(d) => d.to_string(),
            SqlValue::Text(s) => quote_literal(s),
            SqlValue::Date(d) => format!("DATE '{}'", d.format("%Y-%m-%d")),
            SqlValue::Timestamp(ts) => format!("TIMESTAMP '{}'", ts.format("%Y-%m-%d %H:%M:%S%.f")),
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Boolean(b) => write!(f, "{}", b),
            SqlValue::Integer(i) => write!(f, "{}", i),
            SqlValue::Decimal(d) => write!(f, "{}", d),
            SqlValue::Text(s) => f.write_str(s),
            SqlValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            SqlValue::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<Option<String>> for SqlValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(SqlValue::Null, SqlValue::Text)
    }
}

impl From<Option<i64>> for SqlValue {
    fn from(value: Option<i64>) -> Self {
        value.map_or(SqlValue::Null, SqlValue::Integer)
    }
}

impl From<Option<NaiveDate>> for SqlValue {
    fn from(value: Option<NaiveDate>) -> Self {
        value.map_or(SqlValue::Null, SqlValue::Date)
    }
}

pub fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_view_is_lenient() {
        assert_eq!(SqlValue::text(" 42 ").as_integer(), Some(42));
        assert_eq!(SqlValue::text("7.0").as_integer(), Some(7));
        assert_eq!(SqlValue::Decimal(Decimal::new(300, 2)).as_integer(), Some(3));
        assert_eq!(SqlValue::Decimal(Decimal::new(305, 2)).as_integer(), None);
        assert_eq!(SqlValue::text("abc").as_integer(), None);
        assert_eq!(SqlValue::Null.as_integer(), None);
    }

    #[test]
    fn test_text_view_of_scalars() {
        assert_eq!(SqlValue::Integer(12).as_text().as_deref(), Some("12"));
        assert_eq!(
            SqlValue::Decimal(Decimal::new(1200, 2)).as_text().as_deref(),
            Some("12")
        );
        assert_eq!(SqlValue::Null.as_text(), None);
    }

    #[test]
    fn test_sql_literals_are_escaped() {
        assert_eq!(SqlValue::text("O'Hare").to_sql_literal(), "'O''Hare'");
        assert_eq!(SqlValue::Null.to_sql_literal(), "NULL");
        assert_eq!(
            SqlValue::Decimal(Decimal::new(1999, 2)).to_sql_literal(),
            "19.99"
        );
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).map(SqlValue::Date);
        assert_eq!(
            date.map(|d| d.to_sql_literal()).as_deref(),
            Some("DATE '2024-03-09'")
        );
    }
}
