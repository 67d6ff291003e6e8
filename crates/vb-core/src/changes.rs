//! Change normalizer for audit snapshots.
//!
//! The same logical value can arrive as `"95000.50"` from one caller and
//! `95000.5` from another. Normalizing both `before` and `after` snapshots
//! before storage keeps audit diffs free of that churn.
//!
//! Rules, applied recursively through objects and arrays:
//! - a string matching `^-?\d+\.\d+$` becomes a JSON number;
//! - a string under a key ending in `_id` that is all ASCII digits becomes
//!   an integer;
//! - everything else (including `null`) passes through unchanged.
//!
//! [`normalize`] is idempotent. Entities with a typed [`crate::snapshot`]
//! schema go through [`crate::snapshot::SnapshotSchema::normalize`] instead,
//! which falls back to these rules only for fields the schema does not know.

use std::sync::LazyLock;

use serde_json::{Map, Number, Value};

/// Key suffix marking identifier fields.
pub const ID_SUFFIX: &str = "_id";

static DECIMAL_PATTERN: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^-?\d+\.\d+$").expect("decimal pattern"));

/// Canonicalize a snapshot value.
#[must_use]
pub fn normalize(value: &Value) -> Value {
    normalize_keyed(None, value)
}

/// Canonicalize `value` as the field `key` of an enclosing object.
///
/// Exposed for the typed snapshot schema, which defers unknown fields here.
#[must_use]
pub fn normalize_keyed(key: Option<&str>, value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(normalize_object(map)),
        Value::Array(items) => Value::Array(items.iter().map(|v| normalize_keyed(key, v)).collect()),
        Value::String(s) => normalize_string(key, s),
        other => other.clone(),
    }
}

fn normalize_object(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(k, v)| (k.clone(), normalize_keyed(Some(k), v)))
        .collect()
}

fn normalize_string(key: Option<&str>, s: &str) -> Value {
    if key.is_some_and(is_identifier_key) {
        if let Some(n) = parse_identifier(s) {
            return Value::Number(n.into());
        }
    }
    if DECIMAL_PATTERN.is_match(s) {
        if let Some(n) = s.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(n);
        }
    }
    Value::String(s.to_string())
}

/// Whether a field name follows the identifier naming convention.
#[must_use]
pub fn is_identifier_key(key: &str) -> bool {
    key.len() > ID_SUFFIX.len() && key.ends_with(ID_SUFFIX)
}

/// Parse an all-digit string as an integer id. Returns `None` for empty
/// strings, signs, whitespace, or values that overflow `i64`.
#[must_use]
pub fn parse_identifier(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
