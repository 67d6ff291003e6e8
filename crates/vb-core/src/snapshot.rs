//! Typed snapshot schemas for audit payloads.
//!
//! A schema declares, per field, whether a value is an identifier, a decimal
//! amount, a flag, or free text. Normalization under a schema is driven by
//! those declarations: a `theme` of `"12.50"` stays text, a `total_charge` of
//! `"95000"` becomes the number `95000`. Fields missing from the schema fall
//! back to the heuristic rules in [`crate::changes`].

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Number, Value};

use crate::changes::{normalize_keyed, parse_identifier};
use crate::entities::{BundleLine, Reservation};
use crate::enums::EntityType;

/// Declared kind of a snapshot field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Identifier,
    Decimal,
    Flag,
    Text,
    Date,
    /// Nested record (or array of records) with its own schema.
    Records(&'static SnapshotSchema),
}

/// Field declarations for one snapshot shape.
#[derive(Debug)]
pub struct SnapshotSchema {
    pub name: &'static str,
    pub fields: &'static [(&'static str, FieldKind)],
}

pub static BUNDLE_LINE_SCHEMA: SnapshotSchema = SnapshotSchema {
    name: "bundle_line",
    fields: &[
        ("service_id", FieldKind::Identifier),
        ("charge", FieldKind::Decimal),
    ],
};

pub static RESERVATION_SCHEMA: SnapshotSchema = SnapshotSchema {
    name: "reservation",
    fields: &[
        ("id", FieldKind::Identifier),
        ("booking_date", FieldKind::Date),
        ("venue_id", FieldKind::Identifier),
        ("slot_id", FieldKind::Identifier),
        ("owner_id", FieldKind::Identifier),
        ("theme", FieldKind::Text),
        ("photo", FieldKind::Text),
        ("venue_charge", FieldKind::Decimal),
        ("total_charge", FieldKind::Decimal),
        ("active", FieldKind::Flag),
        ("services", FieldKind::Records(&BUNDLE_LINE_SCHEMA)),
    ],
};

/// Schema for an audited entity type, if one is declared.
#[must_use]
pub const fn schema_for(entity: EntityType) -> Option<&'static SnapshotSchema> {
    match entity {
        EntityType::Reservations => Some(&RESERVATION_SCHEMA),
        EntityType::Venues | EntityType::Services | EntityType::TimeSlots | EntityType::Accounts => {
            None
        }
    }
}

impl SnapshotSchema {
    /// Declared kind of `field`, if any.
    #[must_use]
    pub fn kind_of(&self, field: &str) -> Option<FieldKind> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, kind)| *kind)
    }

    /// Canonicalize a snapshot under this schema. Idempotent.
    #[must_use]
    pub fn normalize(&self, value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(self.normalize_object(map)),
            Value::Array(items) => Value::Array(items.iter().map(|v| self.normalize(v)).collect()),
            other => normalize_keyed(None, other),
        }
    }

    fn normalize_object(&self, map: &Map<String, Value>) -> Map<String, Value> {
        map.iter()
            .map(|(key, value)| {
                let normalized = match self.kind_of(key) {
                    Some(kind) => coerce(kind, value),
                    None => normalize_keyed(Some(key), value),
                };
                (key.clone(), normalized)
            })
            .collect()
    }
}

fn coerce(kind: FieldKind, value: &Value) -> Value {
    match (kind, value) {
        (_, Value::Null) => Value::Null,
        (FieldKind::Identifier, Value::String(s)) => {
            parse_identifier(s).map_or_else(|| value.clone(), |n| Value::Number(n.into()))
        }
        (FieldKind::Decimal, Value::String(s)) => Decimal::from_str(s.trim())
            .ok()
            .and_then(decimal_number)
            .map_or_else(|| value.clone(), Value::Number),
        (FieldKind::Decimal, Value::Number(n)) => Decimal::from_str(&n.to_string())
            .ok()
            .and_then(decimal_number)
            .map_or_else(|| value.clone(), Value::Number),
        (FieldKind::Flag, Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Value::Bool(true),
            "false" | "0" => Value::Bool(false),
            _ => value.clone(),
        },
        (FieldKind::Flag, Value::Number(n)) => match n.as_i64() {
            Some(1) => Value::Bool(true),
            Some(0) => Value::Bool(false),
            _ => value.clone(),
        },
        (FieldKind::Records(schema), _) => schema.normalize(value),
        _ => value.clone(),
    }
}

/// Render a decimal as a JSON number: integral amounts become integers,
/// fractional ones become floats.
fn decimal_number(d: Decimal) -> Option<Number> {
    let d = d.normalize();
    if d.scale() == 0 {
        if let Some(i) = d.to_i64() {
            return Some(i.into());
        }
    }
    d.to_f64().and_then(Number::from_f64)
}

/// Build the audit snapshot of a reservation together with its bundle.
///
/// Presentation joins and row timestamps are left out; the audit entry
/// carries its own timestamp.
#[must_use]
pub fn reservation_snapshot(reservation: &Reservation, lines: &[BundleLine]) -> Value {
    let services: Vec<Value> = lines
        .iter()
        .map(|line| {
            serde_json::json!({
                "service_id": line.service_id,
                "charge": line.charge.to_string(),
            })
        })
        .collect();

    let raw = serde_json::json!({
        "id": reservation.id,
        "booking_date": reservation.booking_date.to_string(),
        "venue_id": reservation.venue_id,
        "slot_id": reservation.slot_id,
        "owner_id": reservation.owner_id,
        "theme": reservation.theme,
        "photo": reservation.photo,
        "venue_charge": reservation.venue_charge.to_string(),
        "total_charge": reservation.total_charge.to_string(),
        "active": reservation.active,
        "services": services,
    });
    RESERVATION_SCHEMA.normalize(&raw)
}
