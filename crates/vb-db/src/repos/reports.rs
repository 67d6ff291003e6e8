//! Reporting aggregates over active reservations.
//!
//! Amounts are summed as exact decimals in Rust rather than as SQL `REAL`,
//! so revenue figures match the stored charges to the cent.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use vb_core::aggregates::{ReportWindow, ServiceTakeRate, SlotDemand, VenueUtilization, percentage};

use crate::VenueDb;
use crate::error::DatabaseError;
use crate::helpers::parse_decimal;

/// `AND`-prefixed booking-date conditions for a window, with their params.
fn window_clause(window: ReportWindow) -> (String, Vec<libsql::Value>) {
    let mut clause = String::new();
    let mut params = Vec::new();
    if let Some(from) = window.from {
        params.push(libsql::Value::Text(from.to_string()));
        clause.push_str(&format!(" AND r.booking_date >= ?{}", params.len()));
    }
    if let Some(to) = window.to {
        params.push(libsql::Value::Text(to.to_string()));
        clause.push_str(&format!(" AND r.booking_date <= ?{}", params.len()));
    }
    (clause, params)
}

impl VenueDb {
    /// Caller holds the read gate.
    async fn count_active(&self, window: ReportWindow) -> Result<i64, DatabaseError> {
        let (clause, params) = window_clause(window);
        let sql = format!("SELECT COUNT(*) FROM reservations r WHERE r.active = 1{clause}");
        let mut rows = self
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    /// Bookings, revenue, and average total per venue, busiest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn venue_utilization(
        &self,
        window: ReportWindow,
    ) -> Result<Vec<VenueUtilization>, DatabaseError> {
        let _read = self.read_gate().await;
        let (clause, params) = window_clause(window);
        let sql = format!(
            "SELECT r.venue_id, COALESCE(v.title, 'Venue #' || r.venue_id), r.total_charge
             FROM reservations r LEFT JOIN venues v ON v.id = r.venue_id
             WHERE r.active = 1{clause}"
        );
        let mut rows = self
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;

        let mut acc: BTreeMap<i64, (String, i64, Decimal)> = BTreeMap::new();
        while let Some(row) = rows.next().await? {
            let total = parse_decimal(&row.get::<String>(2)?)?;
            let slot = acc
                .entry(row.get::<i64>(0)?)
                .or_insert_with(|| (String::new(), 0, Decimal::ZERO));
            slot.0 = row.get::<String>(1)?;
            slot.1 += 1;
            slot.2 += total;
        }

        let mut out: Vec<VenueUtilization> = acc
            .into_iter()
            .map(|(venue_id, (venue_title, bookings, revenue))| VenueUtilization {
                venue_id,
                venue_title,
                bookings,
                revenue: revenue.round_dp(2),
                average_total: (revenue / Decimal::from(bookings)).round_dp(2),
            })
            .collect();
        out.sort_by(|a, b| b.bookings.cmp(&a.bookings).then(a.venue_id.cmp(&b.venue_id)));
        Ok(out)
    }

    /// How many active reservations carry each service, most popular first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn service_take_rate(
        &self,
        window: ReportWindow,
    ) -> Result<Vec<ServiceTakeRate>, DatabaseError> {
        let _read = self.read_gate().await;
        let reservations = self.count_active(window).await?;
        let (clause, params) = window_clause(window);
        let sql = format!(
            "SELECT rs.service_id, COALESCE(s.title, 'Service #' || rs.service_id), rs.charge
             FROM reservation_services rs
             JOIN reservations r ON r.id = rs.reservation_id
             LEFT JOIN services s ON s.id = rs.service_id
             WHERE r.active = 1{clause}"
        );
        let mut rows = self
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;

        let mut acc: BTreeMap<i64, (String, i64, Decimal)> = BTreeMap::new();
        while let Some(row) = rows.next().await? {
            let charge = parse_decimal(&row.get::<String>(2)?)?;
            let slot = acc
                .entry(row.get::<i64>(0)?)
                .or_insert_with(|| (String::new(), 0, Decimal::ZERO));
            slot.0 = row.get::<String>(1)?;
            slot.1 += 1;
            slot.2 += charge;
        }

        let mut out: Vec<ServiceTakeRate> = acc
            .into_iter()
            .map(|(service_id, (service_title, used, revenue))| ServiceTakeRate {
                service_id,
                service_title,
                reservations: used,
                take_rate_pct: percentage(used, reservations),
                revenue: revenue.round_dp(2),
            })
            .collect();
        out.sort_by(|a, b| {
            b.reservations
                .cmp(&a.reservations)
                .then(a.service_id.cmp(&b.service_id))
        });
        Ok(out)
    }

    /// Bookings per time slot and their share of all active bookings.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn slot_demand(&self, window: ReportWindow) -> Result<Vec<SlotDemand>, DatabaseError> {
        let _read = self.read_gate().await;
        let (clause, params) = window_clause(window);
        let sql = format!(
            "SELECT r.slot_id,
                    COALESCE(v.title, ''),
                    COALESCE(s.starts_at || '-' || s.ends_at, 'Slot #' || r.slot_id),
                    COUNT(*)
             FROM reservations r
             LEFT JOIN time_slots s ON s.id = r.slot_id
             LEFT JOIN venues v ON v.id = s.venue_id
             WHERE r.active = 1{clause}
             GROUP BY r.slot_id
             ORDER BY COUNT(*) DESC, r.slot_id"
        );
        let mut rows = self
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;

        let mut counted = Vec::new();
        while let Some(row) = rows.next().await? {
            counted.push((
                row.get::<i64>(0)?,
                row.get::<String>(1)?,
                row.get::<String>(2)?,
                row.get::<i64>(3)?,
            ));
        }
        let all: i64 = counted.iter().map(|c| c.3).sum();

        Ok(counted
            .into_iter()
            .map(|(slot_id, venue_title, slot_window, bookings)| SlotDemand {
                slot_id,
                venue_title,
                slot_window,
                bookings,
                share_pct: percentage(bookings, all),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use vb_core::requests::BookingRequest;

    use super::*;
    use crate::test_support::helpers::{booking_request, line, seeded_db};

    async fn seed(db: &VenueDb) {
        let bookings = [
            (1, 2, 3, 95_000, vec![line(1, 10_000)]),
            (1, 2, 4, 105_000, vec![line(1, 10_000), line(2, 2_500)]),
            (2, 3, 4, 60_000, vec![]),
        ];
        for (day, (venue, slot, owner, total, services)) in bookings.into_iter().enumerate() {
            let request = BookingRequest {
                booking_date: NaiveDate::from_ymd_opt(2025, 11, 20 + u32::try_from(day).unwrap())
                    .unwrap(),
                venue_id: venue,
                slot_id: slot,
                total_charge: Decimal::from(total),
                services,
                ..booking_request()
            };
            db.create_reservation(owner, &request).await.unwrap();
        }
        let cancelled = db.create_reservation(3, &booking_request()).await.unwrap().reservation;
        db.soft_delete_reservation(cancelled.id).await.unwrap();
    }

    #[tokio::test]
    async fn utilization_groups_by_venue() {
        let db = seeded_db().await;
        seed(&db).await;

        let rows = db.venue_utilization(ReportWindow::default()).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].venue_title, "Grand Hall");
        assert_eq!(rows[0].bookings, 2);
        assert_eq!(rows[0].revenue, Decimal::from(200_000));
        assert_eq!(rows[0].average_total, Decimal::from(100_000));
        assert_eq!(rows[1].venue_title, "Garden Terrace");
    }

    #[tokio::test]
    async fn take_rate_uses_active_reservations_as_base() {
        let db = seeded_db().await;
        seed(&db).await;

        let rows = db.service_take_rate(ReportWindow::default()).await.unwrap();
        assert_eq!(rows[0].service_title, "Catering");
        assert_eq!(rows[0].reservations, 2);
        assert_eq!(rows[0].take_rate_pct, Decimal::new(6667, 2));
        assert_eq!(rows[0].revenue, Decimal::from(20_000));
        assert_eq!(rows[1].reservations, 1);
    }

    #[tokio::test]
    async fn slot_demand_shares_sum_to_bookings() {
        let db = seeded_db().await;
        seed(&db).await;

        let rows = db.slot_demand(ReportWindow::default()).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].slot_window, "18:00-23:00");
        assert_eq!(rows[0].bookings, 2);
        assert_eq!(rows[0].share_pct, Decimal::new(6667, 2));
        assert_eq!(rows[1].slot_window, "Slot #3");
    }

    #[tokio::test]
    async fn window_narrows_aggregates() {
        let db = seeded_db().await;
        seed(&db).await;

        let window = ReportWindow {
            from: NaiveDate::from_ymd_opt(2025, 11, 22),
            to: None,
        };
        let rows = db.venue_utilization(window).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].venue_id, 2);
        assert!(db.service_take_rate(window).await.unwrap().is_empty());
    }
}
