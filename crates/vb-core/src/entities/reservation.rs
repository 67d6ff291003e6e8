use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A booking of a venue for a date and time slot.
///
/// The trailing `venue_title`, `slot_window`, and `owner_name` fields are
/// presentation joins filled by lookups; they are `None` when the master
/// record is missing and are never written back.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Reservation {
    pub id: i64,
    pub booking_date: NaiveDate,
    pub venue_id: i64,
    pub slot_id: i64,
    pub owner_id: i64,
    pub theme: String,
    pub photo: Option<String>,
    pub venue_charge: Decimal,
    pub total_charge: Decimal,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_window: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
}
