//! Type coercion between cell values and column types.
//!
//! `can_convert` and `convert` are the only way a value crosses into a typed
//! column: edits, pastes, content swaps, drops and column moves all go
//! through them. A value that cannot be converted is left where it was.

#[cfg(test)]
#[path = "coerce_test.rs"]
mod coerce_test;

use std::borrow::Cow;

use serde_json::{Number, Value};
use time::format_description::well_known::Rfc3339;
use time::{Date, Month, OffsetDateTime};

use crate::consts::{FALSE_LITERALS, TRUE_LITERALS};
use crate::table::ColumnType;

/// Largest integer an `f64` holds exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Text form of a cell value as the user would see it.
#[must_use]
pub fn text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed(""),
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Bool(true) => Cow::Borrowed("true"),
        Value::Bool(false) => Cow::Borrowed("false"),
        Value::Number(n) => Cow::Owned(n.to_string()),
        other => Cow::Owned(other.to_string()),
    }
}

/// `null`, or a string that is empty once trimmed.
#[must_use]
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Whether `value` can be written into a column of type `target`.
#[must_use]
pub fn can_convert(value: &Value, target: ColumnType) -> bool {
    if is_blank(value) {
        return true;
    }
    match target {
        ColumnType::String => true,
        ColumnType::Number => as_number(value).is_some(),
        ColumnType::Boolean => is_bool_literal(&text(value)),
        ColumnType::Date => {
            let raw = text(value);
            is_iso_date_literal(raw.trim()) || parse_date(&raw).is_some()
        }
    }
}

/// Convert `value` to the representation used by `target` columns.
///
/// Blank input becomes `""`. A number or date that does not parse is
/// returned unchanged so the caller can decide whether to keep it.
#[must_use]
pub fn convert(value: &Value, target: ColumnType) -> Value {
    if is_blank(value) {
        return Value::String(String::new());
    }
    match target {
        ColumnType::String => Value::String(text(value).trim().to_owned()),
        ColumnType::Number => as_number(value).map_or_else(|| value.clone(), number_value),
        ColumnType::Boolean => {
            let raw = text(value);
            let lowered = raw.trim().to_ascii_lowercase();
            Value::Bool(TRUE_LITERALS.contains(&lowered.as_str()))
        }
        ColumnType::Date => {
            let raw = text(value);
            let trimmed = raw.trim();
            if is_iso_date_literal(trimmed) {
                return Value::String(trimmed.to_owned());
            }
            parse_date(trimmed).map_or_else(|| value.clone(), |d| Value::String(format_date(d)))
        }
    }
}

/// Numeric reading of a cell: JSON numbers as-is, strings parsed after
/// trimming. Booleans and non-finite results are not numbers.
#[must_use]
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Parse decimal text (`"12"`, `" 4.5 "`, `"1e3"`). Rejects `inf` and `NaN`.
#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(n),
        _ => None,
    }
}

/// JSON value for a number: integral values become integers.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER {
        return Value::from(n as i64);
    }
    Number::from_f64(n).map_or(Value::Null, Value::Number)
}

fn is_bool_literal(raw: &str) -> bool {
    let lowered = raw.trim().to_ascii_lowercase();
    TRUE_LITERALS.contains(&lowered.as_str()) || FALSE_LITERALS.contains(&lowered.as_str())
}

/// Whether `raw` is shaped exactly like `YYYY-MM-DD` (digits and dashes only).
#[must_use]
pub fn is_iso_date_literal(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Format a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day())
}

/// Lenient date parser for the formats users paste from invoices.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DD` with an optional `T`/space time
/// suffix, `YYYY/MM/DD`, `MM/DD/YYYY`, `Month D, YYYY` and `D Month YYYY`.
/// Every result is checked against the calendar.
#[must_use]
pub fn parse_date(raw: &str) -> Option<Date> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
        return Some(dt.date());
    }
    if let Some((day_part, _time)) = s.split_once(['T', ' ']) {
        if is_iso_date_literal(day_part) {
            return parse_numeric_date(day_part, '-', DateOrder::YearFirst);
        }
    }
    if s.contains('-') {
        return parse_numeric_date(s, '-', DateOrder::YearFirst);
    }
    if s.contains('/') {
        let order = if s.find('/') == Some(4) { DateOrder::YearFirst } else { DateOrder::MonthFirst };
        return parse_numeric_date(s, '/', order);
    }
    parse_named_month(s)
}

#[derive(Clone, Copy)]
enum DateOrder {
    YearFirst,
    MonthFirst,
}

fn parse_numeric_date(s: &str, sep: char, order: DateOrder) -> Option<Date> {
    let parts: Vec<&str> = s.split(sep).map(str::trim).collect();
    let [a, b, c] = parts.as_slice() else {
        return None;
    };
    let (year, month, day) = match order {
        DateOrder::YearFirst => (*a, *b, *c),
        DateOrder::MonthFirst => (*c, *a, *b),
    };
    if year.len() != 4 {
        return None;
    }
    calendar_date(parse_int(year)?, parse_int(month)?, parse_int(day)?)
}

fn parse_named_month(s: &str) -> Option<Date> {
    let cleaned = s.replace(',', " ");
    let words: Vec<&str> = cleaned.split_whitespace().collect();
    let [a, b, c] = words.as_slice() else {
        return None;
    };
    if let Some(month) = month_from_name(a) {
        return calendar_date(parse_int(c)?, month, parse_int(b)?);
    }
    let month = month_from_name(b)?;
    calendar_date(parse_int(c)?, month, parse_int(a)?)
}

fn month_from_name(name: &str) -> Option<u8> {
    const NAMES: [&str; 12] = [
        "january",
        "february",
        "march",
        "april",
        "may",
        "june",
        "july",
        "august",
        "september",
        "october",
        "november",
        "december",
    ];
    let lowered = name.trim_end_matches('.').to_ascii_lowercase();
    if lowered.len() < 3 {
        return None;
    }
    NAMES
        .iter()
        .zip(1u8..)
        .find(|(full, _)| **full == lowered || (lowered.len() == 3 && full.starts_with(lowered.as_str())))
        .map(|(_, number)| number)
}

fn parse_int<T: std::str::FromStr>(raw: &str) -> Option<T> {
    match raw.parse() {
        Ok(n) => Some(n),
        Err(_) => None,
    }
}

fn calendar_date(year: i32, month: u8, day: u8) -> Option<Date> {
    let Ok(month) = Month::try_from(month) else {
        return None;
    };
    match Date::from_calendar_date(year, month, day) {
        Ok(date) => Some(date),
        Err(_) => None,
    }
}
