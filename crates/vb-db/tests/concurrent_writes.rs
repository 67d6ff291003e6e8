//! Concurrent mutations against one reservation.

mod common;

use std::sync::Arc;

use common::{Harness, ada, gala};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use vb_core::enums::AuditAction;
use vb_core::listing::PageRequest;
use vb_core::requests::BundleLineInput;
use vb_db::repos::audit::AuditFilter;
use vb_db::updates::reservation::ReservationPatchBuilder;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_amendments_each_commit_and_audit() {
    let h = Harness::new().await;
    let desk = Arc::new(h.desk.clone());
    let id = desk.book(&gala(), &ada()).await.unwrap().value.state.reservation.id;

    let mut handles = Vec::new();
    for n in 1..=10_i64 {
        let desk = Arc::clone(&desk);
        handles.push(tokio::spawn(async move {
            let patch = ReservationPatchBuilder::new()
                .total_charge(Decimal::from(90_000 + n))
                .services(vec![BundleLineInput {
                    service_id: n,
                    charge: Decimal::from(n),
                }])
                .build();
            desk.amend(id, &patch, &ada()).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let lines = desk.service().bundle(id).await.unwrap();
    assert_eq!(lines.len(), 1);
    let current = desk.service().get(id, false).await.unwrap();
    assert_eq!(current.total_charge, Decimal::from(90_000 + lines[0].service_id));

    let audit = h
        .db
        .list_audit(&AuditFilter {
            entity_id: Some(id),
            page: PageRequest::new(1, 50),
            ..AuditFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(audit.total, 11);

    // Recording happens after commit, so log order may differ from commit
    // order. Each update's before must still be exactly one earlier after.
    let created = audit
        .items
        .iter()
        .find(|e| e.action == AuditAction::Create)
        .unwrap();
    let mut updates: Vec<_> = audit
        .items
        .iter()
        .filter(|e| e.action == AuditAction::Update)
        .collect();
    let mut state = created.after.clone().unwrap();
    while !updates.is_empty() {
        let next = updates
            .iter()
            .position(|e| e.before.as_ref() == Some(&state))
            .unwrap_or_else(|| panic!("no update starts from {state}"));
        state = updates.remove(next).after.clone().unwrap();
    }
    let latest = desk.service().state(id, false).await.unwrap();
    assert_eq!(state, latest.snapshot());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_bundle_replacements_chain_their_snapshots() {
    let h = Harness::new().await;
    let desk = Arc::new(h.desk.clone());
    let id = desk.book(&gala(), &ada()).await.unwrap().value.state.reservation.id;

    let mut handles = Vec::new();
    for n in 1..=8_i64 {
        let desk = Arc::clone(&desk);
        handles.push(tokio::spawn(async move {
            let lines = vec![BundleLineInput {
                service_id: n,
                charge: Decimal::from(n * 100),
            }];
            desk.replace_bundle(id, &lines, &ada()).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let audit = h
        .db
        .list_audit(&AuditFilter {
            entity_id: Some(id),
            action: Some(AuditAction::Update),
            page: PageRequest::new(1, 50),
            ..AuditFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(audit.total, 8);

    let befores: Vec<_> = audit.items.iter().filter_map(|e| e.before.clone()).collect();
    let afters: Vec<_> = audit.items.iter().filter_map(|e| e.after.clone()).collect();
    let starts_fresh = befores.iter().filter(|b| !afters.contains(b)).count();
    assert_eq!(starts_fresh, 1, "exactly one replacement starts from the booked bundle");
}
