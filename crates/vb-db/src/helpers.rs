//! Row-to-entity parsing helpers.
//!
//! Every repo converts `libsql::Row` (column-indexed) into typed entity
//! structs. These helpers isolate the parsing logic: the dual datetime
//! format (`SQLite`'s `datetime('now')` vs RFC 3339), decimal TEXT columns,
//! and JSON payload columns that may come back as text, blob, or NULL.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rust_decimal::Decimal;

use crate::error::DatabaseError;

/// Format a timestamp for storage.
///
/// Fixed microsecond precision with a `Z` suffix keeps stored values
/// lexicographically ordered, so range filters can compare TEXT directly.
#[must_use]
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00.000000Z"`) and `SQLite`'s
/// default format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse a `YYYY-MM-DD` column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` on a malformed date.
pub fn parse_date(s: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| DatabaseError::Query(format!("Failed to parse date '{s}': {e}")))
}

/// Parse a decimal TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the text is not a decimal number.
pub fn parse_decimal(s: &str) -> Result<Decimal, DatabaseError> {
    Decimal::from_str(s.trim())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse decimal '{s}': {e}")))
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works with all vb-core enums that use `#[serde(rename_all = "snake_case")]`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Read a nullable INTEGER column.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_i64(row: &libsql::Row, idx: i32) -> Result<Option<i64>, DatabaseError> {
    match row.get_value(idx)? {
        libsql::Value::Null => Ok(None),
        libsql::Value::Integer(n) => Ok(Some(n)),
        other => Err(DatabaseError::Query(format!(
            "Expected INTEGER or NULL in column {idx}, got {other:?}"
        ))),
    }
}

/// Read a 0/1 INTEGER column as `bool`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_flag(row: &libsql::Row, idx: i32) -> Result<bool, DatabaseError> {
    Ok(row.get::<i64>(idx)? != 0)
}

/// Decode a structured payload column into a JSON value.
///
/// The column may hold JSON text, UTF-8 bytes of JSON, NULL, or (when
/// written by another tool) a bare scalar. Empty and absent payloads decode
/// to `None`. Unparseable content also decodes to `None` with a warning, so
/// a damaged row never fails a whole listing.
#[must_use]
pub fn decode_payload(value: libsql::Value) -> Option<serde_json::Value> {
    let text = match value {
        libsql::Value::Null => return None,
        libsql::Value::Text(s) => s,
        libsql::Value::Blob(bytes) => match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "payload blob is not UTF-8, treating as absent");
                return None;
            }
        },
        libsql::Value::Integer(n) => return Some(n.into()),
        libsql::Value::Real(x) => {
            return serde_json::Number::from_f64(x).map(serde_json::Value::Number);
        }
    };

    if text.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(&text) {
        Ok(serde_json::Value::Null) => None,
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(error = %e, "payload column holds invalid JSON, treating as absent");
            None
        }
    }
}
