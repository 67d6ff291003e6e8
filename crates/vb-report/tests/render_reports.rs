//! Rendering every aggregate shape through both document formats.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use vb_core::aggregates::{ReportWindow, ServiceTakeRate, SlotDemand, VenueUtilization};
use vb_report::{ReportError, ReportMeta, ReportRow, render_csv, render_pdf};

fn meta() -> ReportMeta {
    ReportMeta {
        organization: "Venuebook Events".into(),
        generated_at: Utc.with_ymd_and_hms(2025, 12, 1, 9, 0, 0).unwrap(),
        window: ReportWindow {
            from: "2025-11-01".parse().ok(),
            to: "2025-11-30".parse().ok(),
        },
    }
}

fn take_rates() -> Vec<ServiceTakeRate> {
    vec![
        ServiceTakeRate {
            service_id: 1,
            service_title: "Catering".into(),
            reservations: 2,
            take_rate_pct: Decimal::new(6667, 2),
            revenue: Decimal::from(20_000),
        },
        ServiceTakeRate {
            service_id: 2,
            service_title: "Photography".into(),
            reservations: 1,
            take_rate_pct: Decimal::new(3333, 2),
            revenue: Decimal::from(2_500),
        },
    ]
}

fn csv_lines<R: ReportRow>(rows: &[R]) -> Vec<String> {
    let dir = tempfile::TempDir::new().unwrap();
    let staged = render_csv(rows, Some(dir.path())).unwrap();
    let text = std::fs::read_to_string(staged.path()).unwrap();
    staged.discard().unwrap();
    text.lines().map(String::from).collect()
}

#[test]
fn take_rate_csv_has_fixed_header() {
    let lines = csv_lines(&take_rates());
    assert_eq!(
        lines,
        vec![
            "service_id,service,reservations,take_rate_pct,revenue",
            "1,Catering,2,66.67,20000",
            "2,Photography,1,33.33,2500",
        ]
    );
}

#[test]
fn slot_and_venue_csv_line_counts() {
    let slots = vec![SlotDemand {
        slot_id: 2,
        venue_title: "Grand Hall".into(),
        slot_window: "18:00-23:00".into(),
        bookings: 3,
        share_pct: Decimal::ONE_HUNDRED,
    }];
    assert_eq!(csv_lines(&slots).len(), 2);

    let venues = vec![
        VenueUtilization {
            venue_id: 1,
            venue_title: "Grand Hall".into(),
            bookings: 3,
            revenue: Decimal::from(285_000),
            average_total: Decimal::from(95_000),
        };
        4
    ];
    assert_eq!(csv_lines(&venues).len(), 5);
}

#[test]
fn take_rate_pdf_renders() {
    assert!(render_pdf(&take_rates(), &meta()).unwrap().starts_with(b"%PDF"));
}

#[test]
fn empty_result_sets_are_refused_by_both_renderers() {
    let none: Vec<SlotDemand> = Vec::new();
    assert!(matches!(render_csv(&none, None), Err(ReportError::Empty)));
    assert!(matches!(render_pdf(&none, &meta()), Err(ReportError::Empty)));
}
