//! Aggregate row shapes produced by the reporting queries.
//!
//! Rows count active reservations only. Amounts are rounded to two places.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Optional booking-date window applied to every aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Bookings and revenue per venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VenueUtilization {
    pub venue_id: i64,
    pub venue_title: String,
    pub bookings: i64,
    pub revenue: Decimal,
    pub average_total: Decimal,
}

/// How often each add-on service is attached to a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ServiceTakeRate {
    pub service_id: i64,
    pub service_title: String,
    pub reservations: i64,
    pub take_rate_pct: Decimal,
    pub revenue: Decimal,
}

/// Bookings per time slot and their share of all bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SlotDemand {
    pub slot_id: i64,
    pub venue_title: String,
    pub slot_window: String,
    pub bookings: i64,
    pub share_pct: Decimal,
}

/// Percentage `part / whole * 100`, rounded to two places. Zero when
/// `whole` is zero.
#[must_use]
pub fn percentage(part: i64, whole: i64) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(whole)).round_dp(2)
}
