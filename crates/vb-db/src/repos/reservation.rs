//! Reservation repository.
//!
//! Reservations are never physically deleted. Lookups exclude cancelled
//! rows unless asked otherwise, and a cancelled row is reported exactly like
//! a missing one.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vb_core::entities::{BundleLine, Reservation};
use vb_core::listing::{PageRequest, Paged, SortSpec};
use vb_core::requests::BookingRequest;
use vb_core::snapshot::reservation_snapshot;

use crate::VenueDb;
use crate::error::DatabaseError;
use crate::helpers::{format_timestamp, get_flag, get_opt_string, parse_date, parse_datetime, parse_decimal};
use crate::repos::bundle::{fetch_lines, insert_lines};
use crate::updates::reservation::ReservationPatch;

const RESERVATION_COLUMNS: &str = "r.id, r.booking_date, r.venue_id, r.slot_id, r.owner_id, r.theme, r.photo,
        r.venue_charge, r.total_charge, r.active, r.created_at, r.updated_at,
        v.title,
        CASE WHEN s.id IS NULL THEN NULL ELSE s.starts_at || '-' || s.ends_at END,
        COALESCE(NULLIF(a.full_name, ''), NULLIF(a.display_name, ''), a.username)";

const RESERVATION_JOINS: &str = "FROM reservations r
        LEFT JOIN venues v ON v.id = r.venue_id
        LEFT JOIN time_slots s ON s.id = r.slot_id
        LEFT JOIN accounts a ON a.id = r.owner_id";

/// Optional equality filters for [`VenueDb::list_reservations`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationFilter {
    pub venue_id: Option<i64>,
    pub owner_id: Option<i64>,
}

/// Paging, ordering, and visibility for reservation listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: PageRequest,
    pub sort: SortSpec,
    pub include_inactive: bool,
}

/// A reservation together with its bundle at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationState {
    pub reservation: Reservation,
    pub lines: Vec<BundleLine>,
}

impl ReservationState {
    /// Audit snapshot of this state.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        reservation_snapshot(&self.reservation, &self.lines)
    }
}

/// The states on either side of one committed write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Amended {
    pub previous: ReservationState,
    pub current: ReservationState,
}

fn row_to_reservation(row: &libsql::Row) -> Result<Reservation, DatabaseError> {
    Ok(Reservation {
        id: row.get::<i64>(0)?,
        booking_date: parse_date(&row.get::<String>(1)?)?,
        venue_id: row.get::<i64>(2)?,
        slot_id: row.get::<i64>(3)?,
        owner_id: row.get::<i64>(4)?,
        theme: row.get::<String>(5)?,
        photo: get_opt_string(row, 6)?,
        venue_charge: parse_decimal(&row.get::<String>(7)?)?,
        total_charge: parse_decimal(&row.get::<String>(8)?)?,
        active: get_flag(row, 9)?,
        created_at: parse_datetime(&row.get::<String>(10)?)?,
        updated_at: parse_datetime(&row.get::<String>(11)?)?,
        venue_title: get_opt_string(row, 12)?,
        slot_window: get_opt_string(row, 13)?,
        owner_name: get_opt_string(row, 14)?,
    })
}

async fn fetch_reservation(
    conn: &libsql::Connection,
    id: i64,
    include_inactive: bool,
) -> Result<Reservation, DatabaseError> {
    let visibility = if include_inactive { "" } else { " AND r.active = 1" };
    let sql = format!("SELECT {RESERVATION_COLUMNS} {RESERVATION_JOINS} WHERE r.id = ?1{visibility}");
    let mut rows = conn.query(&sql, [id]).await?;
    let row = rows.next().await?.ok_or(DatabaseError::NotFound {
        entity: "reservation",
        id,
    })?;
    row_to_reservation(&row)
}

/// Reservation row plus bundle, both read on `conn`.
pub(crate) async fn load_state(
    conn: &libsql::Connection,
    id: i64,
    include_inactive: bool,
) -> Result<ReservationState, DatabaseError> {
    let reservation = fetch_reservation(conn, id, include_inactive).await?;
    let lines = fetch_lines(conn, id).await?;
    Ok(ReservationState { reservation, lines })
}

impl VenueDb {
    /// Insert an active reservation and its initial bundle in one transaction.
    ///
    /// The request must already be validated. The returned state is read
    /// before the transaction commits.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any insert fails; nothing is persisted then.
    pub async fn create_reservation(
        &self,
        owner_id: i64,
        request: &BookingRequest,
    ) -> Result<ReservationState, DatabaseError> {
        let now = format_timestamp(Utc::now());
        let tx = self.begin_write().await?;
        let result = async {
            tx.execute(
                "INSERT INTO reservations (booking_date, venue_id, slot_id, owner_id, theme, photo,
                     venue_charge, total_charge, active, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9, ?9)",
                libsql::params![
                    request.booking_date.to_string(),
                    request.venue_id,
                    request.slot_id,
                    owner_id,
                    request.theme.as_str(),
                    request.photo.as_deref(),
                    request.venue_charge.to_string(),
                    request.total_charge.to_string(),
                    now.as_str()
                ],
            )
            .await?;
            let id = tx.last_insert_rowid();
            insert_lines(&tx, id, &request.services, &now).await?;
            load_state(&tx, id, true).await
        }
        .await;
        let state = tx.finish(result).await?;

        tracing::debug!(
            reservation_id = state.reservation.id,
            lines = state.lines.len(),
            "reservation created"
        );
        Ok(state)
    }

    /// Fetch one reservation with venue title, slot window, and owner name joined.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the id is missing, or inactive
    /// while `include_inactive` is false.
    pub async fn get_reservation(
        &self,
        id: i64,
        include_inactive: bool,
    ) -> Result<Reservation, DatabaseError> {
        let _read = self.read_gate().await;
        fetch_reservation(self.conn(), id, include_inactive).await
    }

    /// Fetch a reservation and its bundle as one consistent state.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` under the same rules as
    /// [`Self::get_reservation`].
    pub async fn get_state(
        &self,
        id: i64,
        include_inactive: bool,
    ) -> Result<ReservationState, DatabaseError> {
        let _read = self.read_gate().await;
        load_state(self.conn(), id, include_inactive).await
    }

    /// List one owner's reservations.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_reservations_for_owner(
        &self,
        owner_id: i64,
        query: ListQuery,
    ) -> Result<Paged<Reservation>, DatabaseError> {
        let filter = ReservationFilter {
            owner_id: Some(owner_id),
            venue_id: None,
        };
        self.list_reservations(filter, query).await
    }

    /// List reservations matching every supplied filter, with an exact total.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_reservations(
        &self,
        filter: ReservationFilter,
        query: ListQuery,
    ) -> Result<Paged<Reservation>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(venue_id) = filter.venue_id {
            params.push(libsql::Value::Integer(venue_id));
            conditions.push(format!("r.venue_id = ?{}", params.len()));
        }
        if let Some(owner_id) = filter.owner_id {
            params.push(libsql::Value::Integer(owner_id));
            conditions.push(format!("r.owner_id = ?{}", params.len()));
        }
        if !query.include_inactive {
            conditions.push("r.active = 1".to_string());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let _read = self.read_gate().await;
        let count_sql = format!("SELECT COUNT(*) FROM reservations r {where_clause}");
        let mut rows = self
            .conn()
            .query(&count_sql, libsql::params_from_iter(params.clone()))
            .await?;
        let total = match rows.next().await? {
            Some(row) => u64::try_from(row.get::<i64>(0)?).unwrap_or_default(),
            None => 0,
        };

        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} {RESERVATION_JOINS} {where_clause}
             ORDER BY {} LIMIT {} OFFSET {}",
            query.sort.order_by(),
            query.page.page_size,
            query.page.offset()
        );
        let mut rows = self
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(row_to_reservation(&row)?);
        }

        Ok(Paged {
            items,
            total,
            page: query.page.page,
            page_size: query.page.page_size,
        })
    }

    /// Apply a patch to an active reservation, replacing its bundle when the
    /// patch carries one. Field changes and bundle replacement commit together,
    /// and both returned states are read inside that transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the reservation is missing or
    /// cancelled, or `DatabaseError` if a write fails.
    pub async fn update_reservation(
        &self,
        id: i64,
        patch: &ReservationPatch,
    ) -> Result<Amended, DatabaseError> {
        let now = format_timestamp(Utc::now());
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(date) = patch.booking_date {
            sets.push(format!("booking_date = ?{idx}"));
            params.push(date.to_string().into());
            idx += 1;
        }
        if let Some(venue_id) = patch.venue_id {
            sets.push(format!("venue_id = ?{idx}"));
            params.push(venue_id.into());
            idx += 1;
        }
        if let Some(slot_id) = patch.slot_id {
            sets.push(format!("slot_id = ?{idx}"));
            params.push(slot_id.into());
            idx += 1;
        }
        if let Some(ref theme) = patch.theme {
            sets.push(format!("theme = ?{idx}"));
            params.push(theme.clone().into());
            idx += 1;
        }
        if let Some(total) = patch.total_charge {
            sets.push(format!("total_charge = ?{idx}"));
            params.push(total.to_string().into());
            idx += 1;
        }
        if let Some(active) = patch.active {
            sets.push(format!("active = ?{idx}"));
            params.push(i64::from(active).into());
            idx += 1;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(now.clone().into());
        idx += 1;

        params.push(id.into());
        let sql = format!(
            "UPDATE reservations SET {} WHERE id = ?{idx} AND active = 1",
            sets.join(", ")
        );

        let tx = self.begin_write().await?;
        let result = async {
            let previous = load_state(&tx, id, false).await?;
            tx.execute(&sql, libsql::params_from_iter(params)).await?;
            if let Some(ref lines) = patch.services {
                tx.execute(
                    "DELETE FROM reservation_services WHERE reservation_id = ?1",
                    [id],
                )
                .await?;
                insert_lines(&tx, id, lines, &now).await?;
            }
            let current = load_state(&tx, id, true).await?;
            Ok::<_, DatabaseError>(Amended { previous, current })
        }
        .await;
        let amended = tx.finish(result).await?;

        tracing::debug!(reservation_id = id, "reservation updated");
        Ok(amended)
    }

    /// Mark a reservation inactive and return its state from just before.
    /// Cancelling an already-cancelled reservation succeeds and leaves its
    /// timestamps untouched.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no reservation has this id.
    pub async fn soft_delete_reservation(&self, id: i64) -> Result<ReservationState, DatabaseError> {
        let now = format_timestamp(Utc::now());
        let tx = self.begin_write().await?;
        let result = async {
            let previous = load_state(&tx, id, true).await?;
            tx.execute(
                "UPDATE reservations
                 SET active = 0,
                     updated_at = CASE WHEN active = 1 THEN ?2 ELSE updated_at END
                 WHERE id = ?1",
                libsql::params![id, now],
            )
            .await?;
            Ok::<_, DatabaseError>(previous)
        }
        .await;
        let previous = tx.finish(result).await?;

        tracing::debug!(reservation_id = id, "reservation cancelled");
        Ok(previous)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use super::*;
    use crate::test_support::helpers::{booking_request, seeded_db};
    use crate::updates::reservation::ReservationPatchBuilder;

    #[tokio::test]
    async fn create_returns_active_row_with_joins() {
        let db = seeded_db().await;
        let created = db.create_reservation(3, &booking_request()).await.unwrap().reservation;

        assert!(created.id > 0);
        assert!(created.active);
        assert_eq!(created.total_charge, Decimal::from(95_000));
        assert_eq!(created.venue_title.as_deref(), Some("Grand Hall"));
        assert_eq!(created.slot_window.as_deref(), Some("18:00-23:00"));
        assert_eq!(created.owner_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(created.created_at, created.updated_at);
    }

    #[tokio::test]
    async fn missing_master_data_still_reads() {
        let db = seeded_db().await;
        let request = BookingRequest {
            venue_id: 99,
            slot_id: 98,
            ..booking_request()
        };
        let created = db.create_reservation(97, &request).await.unwrap().reservation;
        assert_eq!(created.venue_title, None);
        assert_eq!(created.slot_window, None);
        assert_eq!(created.owner_name, None);
    }

    #[tokio::test]
    async fn cancelled_rows_hidden_by_default() {
        let db = seeded_db().await;
        let created = db.create_reservation(3, &booking_request()).await.unwrap().reservation;
        db.soft_delete_reservation(created.id).await.unwrap();

        let hidden = db.get_reservation(created.id, false).await.unwrap_err();
        assert!(hidden.is_not_found());
        assert_eq!(hidden.to_string(), format!("reservation {} not found", created.id));

        let visible = db.get_reservation(created.id, true).await.unwrap();
        assert!(!visible.active);
    }

    #[tokio::test]
    async fn soft_delete_is_idempotent() {
        let db = seeded_db().await;
        let created = db.create_reservation(3, &booking_request()).await.unwrap().reservation;
        let before = db.soft_delete_reservation(created.id).await.unwrap();
        assert!(before.reservation.active);
        let first = db.get_reservation(created.id, true).await.unwrap();
        let again = db.soft_delete_reservation(created.id).await.unwrap();
        assert!(!again.reservation.active);
        let second = db.get_reservation(created.id, true).await.unwrap();

        assert!(!second.active);
        assert_eq!(first.updated_at, second.updated_at);
        assert!(db.soft_delete_reservation(4_242).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn update_applies_patch_fields() {
        let db = seeded_db().await;
        let created = db.create_reservation(3, &booking_request()).await.unwrap().reservation;
        let patch = ReservationPatchBuilder::new()
            .total_charge(Decimal::from(90_000))
            .booking_date(NaiveDate::from_ymd_opt(2025, 12, 1).unwrap())
            .build();

        let amended = db.update_reservation(created.id, &patch).await.unwrap();
        assert_eq!(amended.previous.reservation, created);
        let updated = amended.current.reservation;
        assert_eq!(updated.total_charge, Decimal::from(90_000));
        assert_eq!(updated.booking_date, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(updated.theme, created.theme);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn update_cannot_reactivate() {
        let db = seeded_db().await;
        let created = db.create_reservation(3, &booking_request()).await.unwrap().reservation;
        db.soft_delete_reservation(created.id).await.unwrap();

        let patch = ReservationPatchBuilder::new().active(true).build();
        let err = db.update_reservation(created.id, &patch).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(!db.get_reservation(created.id, true).await.unwrap().active);
    }

    #[tokio::test]
    async fn update_with_services_replaces_bundle() {
        let db = seeded_db().await;
        let created = db.create_reservation(3, &booking_request()).await.unwrap().reservation;
        let patch = ReservationPatchBuilder::new()
            .services(vec![vb_core::requests::BundleLineInput {
                service_id: 2,
                charge: Decimal::from(2_500),
            }])
            .build();

        let amended = db.update_reservation(created.id, &patch).await.unwrap();
        assert_eq!(amended.previous.lines[0].service_id, 1);
        let lines = db.get_bundle_lines(created.id).await.unwrap();
        assert_eq!(lines, amended.current.lines);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].service_id, 2);
    }

    #[tokio::test]
    async fn failed_bundle_in_update_rolls_back_fields() {
        let db = seeded_db().await;
        let created = db.create_reservation(3, &booking_request()).await.unwrap().reservation;
        let line = vb_core::requests::BundleLineInput {
            service_id: 2,
            charge: Decimal::ONE,
        };
        // Duplicate service ids violate the bundle's unique constraint.
        let patch = ReservationPatchBuilder::new()
            .total_charge(Decimal::from(1))
            .services(vec![line.clone(), line])
            .build();

        assert!(db.update_reservation(created.id, &patch).await.is_err());
        let after = db.get_reservation(created.id, false).await.unwrap();
        assert_eq!(after.total_charge, Decimal::from(95_000));
        assert_eq!(db.get_bundle_lines(created.id).await.unwrap().len(), 1);
    }

    async fn seed_listing(db: &VenueDb) {
        for (venue, owner, total, day) in [
            (1, 3, 120_000, 3),
            (2, 3, 80_000, 1),
            (1, 4, 100_000, 2),
            (2, 3, 95_000, 4),
        ] {
            let request = BookingRequest {
                venue_id: venue,
                total_charge: Decimal::from(total),
                booking_date: NaiveDate::from_ymd_opt(2025, 11, day).unwrap(),
                services: vec![],
                ..booking_request()
            };
            db.create_reservation(owner, &request).await.unwrap();
        }
    }

    #[rstest]
    #[case("date", "asc", vec![80_000, 120_000, 95_000])]
    #[case("total_charge", "desc", vec![120_000, 95_000, 80_000])]
    #[case("nonsense", "desc", vec![80_000, 120_000, 95_000])]
    #[tokio::test]
    async fn owner_listing_sorts(
        #[case] column: &str,
        #[case] direction: &str,
        #[case] expected: Vec<i64>,
    ) {
        let db = seeded_db().await;
        seed_listing(&db).await;

        let query = ListQuery {
            sort: SortSpec::parse(column, direction),
            ..ListQuery::default()
        };
        let page = db.list_reservations_for_owner(3, query).await.unwrap();
        let totals: Vec<Decimal> = page.items.iter().map(|r| r.total_charge).collect();
        let expected: Vec<Decimal> = expected.into_iter().map(Decimal::from).collect();
        assert_eq!(totals, expected);
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn list_all_filters_and_pages() {
        let db = seeded_db().await;
        seed_listing(&db).await;

        let by_venue = db
            .list_reservations(
                ReservationFilter {
                    venue_id: Some(1),
                    owner_id: None,
                },
                ListQuery::default(),
            )
            .await
            .unwrap();
        assert_eq!(by_venue.total, 2);
        assert!(by_venue.items.iter().all(|r| r.venue_id == 1));

        let query = ListQuery {
            page: PageRequest::new(2, 3),
            ..ListQuery::default()
        };
        let second = db
            .list_reservations(ReservationFilter::default(), query)
            .await
            .unwrap();
        assert_eq!(second.total, 4);
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.page, 2);
    }

    #[tokio::test]
    async fn listing_respects_include_inactive() {
        let db = seeded_db().await;
        seed_listing(&db).await;
        let first = db
            .list_reservations(ReservationFilter::default(), ListQuery::default())
            .await
            .unwrap();
        db.soft_delete_reservation(first.items[0].id).await.unwrap();

        let active = db
            .list_reservations(ReservationFilter::default(), ListQuery::default())
            .await
            .unwrap();
        assert_eq!(active.total, 3);

        let everything = db
            .list_reservations(
                ReservationFilter::default(),
                ListQuery {
                    include_inactive: true,
                    ..ListQuery::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(everything.total, 4);
    }
}
