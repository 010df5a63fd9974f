// salesmart-core/src/domain/transform/dates.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::domain::model::SqlValue;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// Lenient calendar-date coercion. Anything unparseable is `None`, never an error.
pub fn parse_date(value: &SqlValue) -> Option<NaiveDate> {
    match value {
        SqlValue::Date(d) => Some(*d),
        SqlValue::Timestamp(ts) => Some(ts.date()),
        SqlValue::Text(s) => parse_date_str(s.trim()),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|ts| ts.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}
