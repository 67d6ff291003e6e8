//! Row shapes the renderers understand.

use vb_core::aggregates::{ServiceTakeRate, SlotDemand, VenueUtilization};

/// An aggregate row with a fixed column layout.
///
/// `cells` must yield exactly one value per entry in `HEADERS`.
pub trait ReportRow {
    const TITLE: &'static str;
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

impl ReportRow for VenueUtilization {
    const TITLE: &'static str = "Venue utilization";
    const HEADERS: &'static [&'static str] =
        &["venue_id", "venue", "bookings", "revenue", "average_total"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.venue_id.to_string(),
            self.venue_title.clone(),
            self.bookings.to_string(),
            self.revenue.to_string(),
            self.average_total.to_string(),
        ]
    }
}

impl ReportRow for ServiceTakeRate {
    const TITLE: &'static str = "Service take-rate";
    const HEADERS: &'static [&'static str] =
        &["service_id", "service", "reservations", "take_rate_pct", "revenue"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.service_id.to_string(),
            self.service_title.clone(),
            self.reservations.to_string(),
            self.take_rate_pct.to_string(),
            self.revenue.to_string(),
        ]
    }
}

impl ReportRow for SlotDemand {
    const TITLE: &'static str = "Slot demand";
    const HEADERS: &'static [&'static str] =
        &["slot_id", "venue", "slot", "bookings", "share_pct"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.slot_id.to_string(),
            self.venue_title.clone(),
            self.slot_window.clone(),
            self.bookings.to_string(),
            self.share_pct.to_string(),
        ]
    }
}
