//! Service bundle repository.
//!
//! A reservation's bundle is only ever replaced whole: delete every line,
//! insert the new set, inside one immediate transaction.

use chrono::Utc;
use vb_core::entities::BundleLine;
use vb_core::requests::BundleLineInput;

use crate::VenueDb;
use crate::error::DatabaseError;
use crate::helpers::{format_timestamp, parse_datetime, parse_decimal};
use crate::repos::reservation::{Amended, load_state};

/// Insert bundle lines for a reservation on the given connection.
pub(crate) async fn insert_lines(
    conn: &libsql::Connection,
    reservation_id: i64,
    lines: &[BundleLineInput],
    now: &str,
) -> Result<(), DatabaseError> {
    for line in lines {
        conn.execute(
            "INSERT INTO reservation_services (reservation_id, service_id, charge, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            libsql::params![reservation_id, line.service_id, line.charge.to_string(), now],
        )
        .await?;
    }
    Ok(())
}

/// Bundle lines in insertion order, read on the given connection.
pub(crate) async fn fetch_lines(
    conn: &libsql::Connection,
    reservation_id: i64,
) -> Result<Vec<BundleLine>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT id, reservation_id, service_id, charge, created_at, updated_at
             FROM reservation_services WHERE reservation_id = ?1 ORDER BY id",
            [reservation_id],
        )
        .await?;

    let mut lines = Vec::new();
    while let Some(row) = rows.next().await? {
        lines.push(BundleLine {
            id: row.get::<i64>(0)?,
            reservation_id: row.get::<i64>(1)?,
            service_id: row.get::<i64>(2)?,
            charge: parse_decimal(&row.get::<String>(3)?)?,
            created_at: parse_datetime(&row.get::<String>(4)?)?,
            updated_at: parse_datetime(&row.get::<String>(5)?)?,
        });
    }
    Ok(lines)
}

impl VenueDb {
    /// Replace the full bundle of an active reservation.
    ///
    /// The state before and after the replacement is read inside the same
    /// transaction, so concurrent writers each see the other's committed
    /// result. An empty `lines` clears the bundle.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the reservation is missing or
    /// cancelled. Any failure rolls the whole replacement back.
    pub async fn replace_bundle(
        &self,
        reservation_id: i64,
        lines: &[BundleLineInput],
    ) -> Result<Amended, DatabaseError> {
        let now = format_timestamp(Utc::now());
        let tx = self.begin_write().await?;
        let result = async {
            let previous = load_state(&tx, reservation_id, false).await?;
            tx.execute(
                "UPDATE reservations SET updated_at = ?2 WHERE id = ?1 AND active = 1",
                libsql::params![reservation_id, now.as_str()],
            )
            .await?;
            tx.execute(
                "DELETE FROM reservation_services WHERE reservation_id = ?1",
                [reservation_id],
            )
            .await?;
            insert_lines(&tx, reservation_id, lines, &now).await?;
            let current = load_state(&tx, reservation_id, true).await?;
            Ok::<_, DatabaseError>(Amended { previous, current })
        }
        .await;
        let replaced = tx.finish(result).await?;

        tracing::debug!(reservation_id, lines = lines.len(), "bundle replaced");
        Ok(replaced)
    }

    /// Bundle lines in insertion order. Empty when the reservation has none
    /// or does not exist.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn get_bundle_lines(
        &self,
        reservation_id: i64,
    ) -> Result<Vec<BundleLine>, DatabaseError> {
        let _read = self.read_gate().await;
        fetch_lines(self.conn(), reservation_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    use super::*;
    use crate::test_support::helpers::{booking_request, line, seeded_db};

    fn services(lines: &[BundleLine]) -> Vec<(i64, Decimal)> {
        lines.iter().map(|l| (l.service_id, l.charge)).collect()
    }

    #[tokio::test]
    async fn create_persists_initial_bundle() {
        let db = seeded_db().await;
        let created = db.create_reservation(3, &booking_request()).await.unwrap().reservation;
        let lines = db.get_bundle_lines(created.id).await.unwrap();
        assert_eq!(services(&lines), vec![(1, Decimal::from(10_000))]);
    }

    #[tokio::test]
    async fn second_replacement_wins() {
        let db = seeded_db().await;
        let created = db.create_reservation(3, &booking_request()).await.unwrap().reservation;

        let l1 = vec![line(1, 100), line(2, 200)];
        let l2 = vec![line(3, 300)];
        db.replace_bundle(created.id, &l1).await.unwrap();
        let returned = db.replace_bundle(created.id, &l2).await.unwrap();

        let stored = db.get_bundle_lines(created.id).await.unwrap();
        assert_eq!(services(&stored), vec![(3, Decimal::from(300))]);
        assert_eq!(returned.current.lines, stored);
        assert_eq!(
            services(&returned.previous.lines),
            vec![(1, Decimal::from(100)), (2, Decimal::from(200))]
        );
    }

    #[tokio::test]
    async fn empty_replacement_clears_bundle() {
        let db = seeded_db().await;
        let created = db.create_reservation(3, &booking_request()).await.unwrap().reservation;
        let replaced = db.replace_bundle(created.id, &[]).await.unwrap();
        assert!(replaced.current.lines.is_empty());
        assert_eq!(replaced.previous.lines.len(), 1);
    }

    #[tokio::test]
    async fn replacement_rejected_for_cancelled_or_missing() {
        let db = seeded_db().await;
        let created = db.create_reservation(3, &booking_request()).await.unwrap().reservation;
        db.soft_delete_reservation(created.id).await.unwrap();

        let err = db.replace_bundle(created.id, &[line(2, 5)]).await.unwrap_err();
        assert!(err.is_not_found());
        let err = db.replace_bundle(8_888, &[]).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn cancellation_keeps_lines_queryable() {
        let db = seeded_db().await;
        let created = db.create_reservation(3, &booking_request()).await.unwrap().reservation;
        db.soft_delete_reservation(created.id).await.unwrap();
        assert_eq!(db.get_bundle_lines(created.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_insert_restores_previous_bundle() {
        let db = seeded_db().await;
        let created = db.create_reservation(3, &booking_request()).await.unwrap().reservation;

        let err = db
            .replace_bundle(created.id, &[line(4, 10), line(4, 20)])
            .await;
        assert!(err.is_err());
        let stored = db.get_bundle_lines(created.id).await.unwrap();
        assert_eq!(services(&stored), vec![(1, Decimal::from(10_000))]);
    }

    #[tokio::test]
    async fn concurrent_replacements_never_interleave() {
        let db = Arc::new(seeded_db().await);
        let created = db.create_reservation(3, &booking_request()).await.unwrap().reservation;

        let mut handles = Vec::new();
        for n in 1..=8_i64 {
            let db = Arc::clone(&db);
            let id = created.id;
            handles.push(tokio::spawn(async move {
                db.replace_bundle(id, &[line(n, n * 10), line(n + 100, n)])
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let stored = db.get_bundle_lines(created.id).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].service_id, stored[0].service_id + 100);
    }
}
