//! Fixtures shared by the vb-db integration suites.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tempfile::TempDir;
use vb_core::enums::Role;
use vb_core::identity::{Actor, RequestOrigin};
use vb_core::requests::{BookingRequest, BundleLineInput};
use vb_db::VenueDb;
use vb_db::desk::{BookingDesk, CallContext};
use vb_db::notify::OutboxSink;
use vb_db::recorder::AuditRecorder;
use vb_db::service::BookingService;

const MASTER_DATA: &str = "
    INSERT INTO accounts (id, username, full_name, email, role) VALUES
        (1, 'root', 'Olga Ops', 'ops@venuebook.local', 'admin'),
        (3, 'ada', 'Ada Lovelace', 'ada@example.com', 'client');
    INSERT INTO venues (id, title) VALUES (1, 'Grand Hall');
    INSERT INTO time_slots (id, venue_id, starts_at, ends_at) VALUES (2, 1, '18:00', '23:00');
    INSERT INTO services (id, title) VALUES (1, 'Catering'), (2, 'Photography');
";

/// A file-backed database plus a desk wired to a JSON-lines outbox.
pub struct Harness {
    pub dir: TempDir,
    pub db: Arc<VenueDb>,
    pub desk: BookingDesk,
}

impl Harness {
    pub async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("venuebook.db");
        let db = Arc::new(VenueDb::open_local(path.to_str().unwrap()).await.unwrap());
        db.conn().execute_batch(MASTER_DATA).await.unwrap();

        let sink = OutboxSink::new(
            dir.path().join("outbox.jsonl"),
            "bookings@venuebook.local",
            vec!["ops@venuebook.local".into()],
        )
        .unwrap();
        let service = BookingService::new(Arc::clone(&db), Arc::new(sink));
        let desk = BookingDesk::new(service, AuditRecorder::new(db.clone()));
        Self { dir, db, desk }
    }

    pub fn outbox(&self) -> std::path::PathBuf {
        self.dir.path().join("outbox.jsonl")
    }
}

pub fn ada() -> CallContext {
    CallContext {
        actor: Actor {
            id: 3,
            role: Role::Client,
            display_name: None,
            username: Some("ada".into()),
            full_name: Some("Ada Lovelace".into()),
        },
        origin: RequestOrigin {
            ip: Some("::1".into()),
            agent: Some("integration".into()),
        },
    }
}

pub fn gala() -> BookingRequest {
    BookingRequest {
        booking_date: NaiveDate::from_ymd_opt(2025, 11, 20).unwrap(),
        venue_id: 1,
        slot_id: 2,
        owner_id: None,
        theme: "Winter gala".into(),
        photo: None,
        venue_charge: Decimal::from(85_000),
        total_charge: Decimal::from(95_000),
        services: vec![BundleLineInput {
            service_id: 1,
            charge: Decimal::from(10_000),
        }],
    }
}
