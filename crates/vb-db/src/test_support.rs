//! Shared test utilities for vb-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;
    use vb_core::entities::{Account, AuditEntry, NewAuditEntry, Reservation};
    use vb_core::enums::Role;
    use vb_core::identity::{Actor, RequestOrigin};
    use vb_core::requests::{BookingRequest, BundleLineInput};

    use crate::VenueDb;
    use crate::desk::CallContext;
    use crate::error::{DatabaseError, NotifyError};
    use crate::notify::NotificationSink;
    use crate::recorder::AuditStore;

    const SEED: &str = "
        INSERT INTO accounts (id, username, full_name, display_name, email, role, active) VALUES
            (1, 'root', NULL, 'Operations', 'ops@venuebook.local', 'admin', 1),
            (2, 'frontdesk', NULL, 'Front desk', NULL, 'staff', 1),
            (3, 'ada', 'Ada Lovelace', NULL, 'ada@example.com', 'client', 1),
            (4, 'grace', 'Grace Hopper', NULL, 'grace@example.com', 'client', 1),
            (5, 'gone', NULL, NULL, NULL, 'admin', 0);
        INSERT INTO venues (id, title, capacity, base_charge) VALUES
            (1, 'Grand Hall', 300, '85000'),
            (2, 'Garden Terrace', 120, '40000');
        INSERT INTO time_slots (id, venue_id, starts_at, ends_at) VALUES
            (1, 1, '10:00', '15:00'),
            (2, 1, '18:00', '23:00');
        INSERT INTO services (id, title, charge) VALUES
            (1, 'Catering', '10000'),
            (2, 'Photography', '2500'),
            (3, 'Sound system', '3000'),
            (4, 'Lighting', '1500');
    ";

    /// Empty in-memory database with the schema applied.
    pub async fn test_db() -> VenueDb {
        VenueDb::open_local(":memory:").await.unwrap()
    }

    /// In-memory database with accounts, venues, slots, and services.
    pub async fn seeded_db() -> VenueDb {
        let db = test_db().await;
        db.conn().execute_batch(SEED).await.unwrap();
        db
    }

    /// The reference booking: Grand Hall evening slot with catering.
    pub fn booking_request() -> BookingRequest {
        BookingRequest {
            booking_date: NaiveDate::from_ymd_opt(2025, 11, 20).unwrap(),
            venue_id: 1,
            slot_id: 2,
            owner_id: None,
            theme: "Winter gala".into(),
            photo: None,
            venue_charge: Decimal::from(85_000),
            total_charge: Decimal::from(95_000),
            services: vec![line(1, 10_000)],
        }
    }

    pub fn line(service_id: i64, charge: i64) -> BundleLineInput {
        BundleLineInput {
            service_id,
            charge: Decimal::from(charge),
        }
    }

    pub fn client_actor() -> Actor {
        Actor {
            id: 3,
            role: Role::Client,
            display_name: None,
            username: Some("ada".into()),
            full_name: Some("Ada Lovelace".into()),
        }
    }

    pub fn client_context() -> CallContext {
        CallContext {
            actor: client_actor(),
            origin: RequestOrigin {
                ip: Some("::1".into()),
                agent: Some("vb-db tests".into()),
            },
        }
    }

    /// A reservation value that was never persisted.
    pub fn sample_reservation() -> Reservation {
        let now = Utc::now();
        Reservation {
            id: 1,
            booking_date: NaiveDate::from_ymd_opt(2025, 11, 20).unwrap(),
            venue_id: 1,
            slot_id: 2,
            owner_id: 3,
            theme: "Winter gala".into(),
            photo: None,
            venue_charge: Decimal::from(85_000),
            total_charge: Decimal::from(95_000),
            active: true,
            created_at: now,
            updated_at: now,
            venue_title: Some("Grand Hall".into()),
            slot_window: Some("18:00-23:00".into()),
            owner_name: Some("Ada Lovelace".into()),
        }
    }

    /// Sink that remembers `(reservation_id, owner_id)` for each delivery.
    #[derive(Default)]
    pub struct RecordingSink {
        delivered: Mutex<Vec<(i64, i64)>>,
    }

    impl RecordingSink {
        pub fn delivered(&self) -> Vec<(i64, i64)> {
            self.delivered.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn deliver(&self, reservation: &Reservation, owner: &Account) -> Result<(), NotifyError> {
            self.delivered
                .lock()
                .unwrap()
                .push((reservation.id, owner.id));
            Ok(())
        }
    }

    pub struct FailingSink;

    #[async_trait]
    impl NotificationSink for FailingSink {
        async fn deliver(&self, reservation: &Reservation, _owner: &Account) -> Result<(), NotifyError> {
            Err(NotifyError::NoRecipient {
                reservation_id: reservation.id,
            })
        }
    }

    /// Audit store that is always down.
    pub struct FailingAuditStore;

    #[async_trait]
    impl AuditStore for FailingAuditStore {
        async fn insert(&self, _entry: &NewAuditEntry) -> Result<AuditEntry, DatabaseError> {
            Err(DatabaseError::Query("audit store offline".into()))
        }
    }
}
